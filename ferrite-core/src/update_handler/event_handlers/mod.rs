pub mod message_create;
