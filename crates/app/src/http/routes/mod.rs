pub mod cron;
pub mod dashboard;
pub mod health;
pub mod reddit;
