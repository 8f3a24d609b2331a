// src/model/mod.rs
//! Typed representations of Notion API data.
//!
//! Responses are decoded per type tag into closed enums (property values,
//! blocks) so every consumer matches exhaustively instead of probing JSON.

pub mod block;
pub mod objects;
pub mod property_value;
pub mod schema;

pub use block::{expand_block_type, Block, BlockContent, PLAIN_TEXT_LANGUAGE};
pub use objects::{
    date_part, decode, decode_database, Comment, Database, FileUpload, Page, SearchHit, User,
};
pub use property_value::{
    DateRange, FormulaValue, NumberValue, PropertyValue, RelationRef, RollupValue, SelectOption,
    UserRef,
};
pub use schema::{PropertyKind, PropertySchema, SchemaEntry};
