pub mod info;
pub mod invoice;
