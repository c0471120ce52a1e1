pub mod cv;
pub mod health;
pub mod jobs;
