pub mod response_service;
pub mod vacancy_service;
