pub mod msg_type_mobile;
pub mod msg_type_relais;
pub mod registration_response;
pub mod release_cause;
