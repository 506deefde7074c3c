pub mod group_document;
pub mod member_set;
