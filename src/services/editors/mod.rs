pub mod bowtie;
pub mod choice;
pub mod dosage;
pub mod highlight;
pub mod matrix;
pub mod ranking;
pub mod slots;
pub mod trend;
