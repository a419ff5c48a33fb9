pub mod secure_container;
