pub mod doctor;
pub mod explain;
pub mod output;
pub mod search;
