pub mod email_service;
pub mod ipo_service;
pub mod job_scheduler_service;
pub mod lead_service;
pub mod seeder;
