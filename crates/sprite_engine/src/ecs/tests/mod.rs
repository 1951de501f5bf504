//! In-crate integration tests exercising the ECS layers together

mod blueprint_integration;
