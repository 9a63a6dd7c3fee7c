pub mod smshub;
