pub mod application {
    pub mod service;
}

pub mod data {
    pub mod memory;
    pub mod postgres;
}

pub mod domain {
    pub mod error;
    pub mod repository;
    pub mod user;
}

pub mod infrastructure {
    pub mod config;
    pub mod logging;
}

pub mod presentation {
    pub mod handlers;
    pub mod middleware;
    pub mod routes;
}
