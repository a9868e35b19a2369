pub mod bottle_service;
