//! RAML doc generator - API documentation from the routes a router registers.
//!
//! A route source walks its routes, a formatting function describes each one, and the
//! resulting resources are collected into a RAML [`Document`](raml::Document) keyed by
//! path and method.
//!
//! # Architecture
//!
//! 1. [`walker`] - The [`Routes`](walker::Routes) walk abstraction and handler identity
//! 2. [`router`] - A route table whose handlers carry explicit identity
//! 3. [`scanner`] - Recursively scans project directories for Rust files
//! 4. [`parser`] - Parses Rust source files into syntax trees
//! 5. [`source`] - Walks axum routers found in parsed source code
//! 6. [`raml`] - The RAML document and route-to-document aggregation
//! 7. [`format`] - The default "developer docs" formatting function
//! 8. [`serializer`] - Serializes the document to RAML or JSON
//!
//! # Example Usage
//!
//! ```
//! use raml_docgen::format::developer_docs;
//! use raml_docgen::func_info;
//! use raml_docgen::raml::Document;
//! use raml_docgen::router::RouteTable;
//! use raml_docgen::serializer::serialize_raml;
//! use raml_docgen::walker::Method;
//!
//! let mut r = RouteTable::new();
//! r.use_middleware(func_info!(request_id));
//! r.get("/ping", func_info!(ping, "Ping replies with pong."));
//! r.post("/articles", func_info!(create_article, "CreateArticle persists the posted Article."));
//!
//! let mut doc = Document::new("Big Mux", "https://bigmux.example.com", "v1.0", "application/json");
//! doc.add_resources_from_walk(&r, developer_docs).unwrap();
//!
//! assert!(doc.resource("/articles", Method::Post).unwrap().responses.contains_key(&201));
//! println!("{}", serialize_raml(&doc).unwrap());
//! ```
//!
//! # Command-Line Interface
//!
//! For command-line usage, see the [`cli`] module.

pub mod cli;
pub mod error;
pub mod format;
pub mod parser;
pub mod raml;
pub mod router;
pub mod scanner;
pub mod serializer;
pub mod source;
pub mod walker;
