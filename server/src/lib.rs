pub mod config;
pub mod errors;
pub mod money;
pub mod protobuf {
    pub mod from;
    pub mod into;
}
pub mod protos {
    pub mod campaign;
    pub mod donation;
    pub mod organization;
    pub mod well_known;
}
pub mod services {
    pub mod campaign;
    pub mod donation;
    pub mod health;
    pub mod organization;
}
pub mod validate;
