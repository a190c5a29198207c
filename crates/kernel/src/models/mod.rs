//! Data models for the content tree.
//!
//! Pages own elements, elements own contents and (when nestable) child
//! elements. All records are created and mutated by an external content
//! management layer; this kernel only reads them.

mod content;
mod element;
mod page;

pub use content::Content;
pub use element::Element;
pub use page::Page;
