pub mod vacancy;
