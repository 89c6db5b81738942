pub mod organization_service;
