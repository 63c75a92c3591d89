// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Typed, parent-linked file handles
//!
//! A handle is a client-side snapshot of a remote path's type at resolution
//! time: absent, document, or collection. Handles are immutable values,
//! rebuilt fresh by every resolving call, and their parent chain is a rooted
//! tree by construction; handles are never relinked after creation.

use std::fmt;
use std::sync::Arc;

use docstore_proto::{FileKind, Filter, Request};
use serde_json::Value;

use crate::conn::Database;
use crate::error::OperationError;

/// A remote path's current type.
#[derive(Clone)]
pub enum File {
    /// The path does not exist, or the handle is the synthetic unknown one.
    None(AbsentFile),
    /// A leaf holding structured content.
    Document(Document),
    /// A container of child files.
    Collection(Collection),
}

impl File {
    /// Name of this file; empty only for the synthetic unknown handle.
    pub fn name(&self) -> &str {
        match self {
            File::None(f) => f.name(),
            File::Document(f) => f.name(),
            File::Collection(f) => f.name(),
        }
    }

    /// Owning collection; `None` for a root or unknown handle.
    pub fn parent(&self) -> Option<&Collection> {
        match self {
            File::None(f) => f.parent(),
            File::Document(f) => f.parent(),
            File::Collection(f) => f.parent(),
        }
    }

    /// Slash-delimited path from the root, root name included.
    pub fn path(&self) -> String {
        match self {
            File::None(f) => f.path(),
            File::Document(f) => f.path(),
            File::Collection(f) => f.path(),
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, File::None(_))
    }

    pub fn is_document(&self) -> bool {
        matches!(self, File::Document(_))
    }

    pub fn is_collection(&self) -> bool {
        matches!(self, File::Collection(_))
    }

    pub fn as_document(&self) -> Option<&Document> {
        match self {
            File::Document(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_collection(&self) -> Option<&Collection> {
        match self {
            File::Collection(f) => Some(f),
            _ => None,
        }
    }

    pub fn into_document(self) -> Option<Document> {
        match self {
            File::Document(f) => Some(f),
            _ => None,
        }
    }

    pub fn into_collection(self) -> Option<Collection> {
        match self {
            File::Collection(f) => Some(f),
            _ => None,
        }
    }

    /// Delete the remote file. Ignored for an absent handle.
    pub fn delete(&self) -> Result<(), OperationError> {
        match self {
            File::None(_) => Ok(()),
            File::Document(f) => f.delete(),
            File::Collection(f) => f.delete(),
        }
    }

    pub(crate) fn absent() -> Self {
        File::None(AbsentFile {
            parent: None,
            name: String::new(),
        })
    }
}

impl fmt::Debug for File {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self {
            File::None(_) => "None",
            File::Document(_) => "Document",
            File::Collection(_) => "Collection",
        };
        f.debug_struct("File").field("kind", &kind).field("path", &self.path()).finish()
    }
}

fn path_of(parent: Option<&Arc<Collection>>, name: &str) -> String {
    match parent {
        Some(parent) => format!("{}/{}", parent.path(), name),
        None => name.to_string(),
    }
}

/// Placeholder handle for a path that does not exist.
#[derive(Clone)]
pub struct AbsentFile {
    parent: Option<Arc<Collection>>,
    name: String,
}

impl AbsentFile {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent(&self) -> Option<&Collection> {
        self.parent.as_deref()
    }

    pub fn path(&self) -> String {
        path_of(self.parent.as_ref(), &self.name)
    }
}

/// Handle to a remote document.
#[derive(Clone)]
pub struct Document {
    db: Database,
    parent: Option<Arc<Collection>>,
    name: String,
}

impl Document {
    pub(crate) fn new(
        db: Database,
        parent: Option<Arc<Collection>>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            db,
            parent,
            name: name.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent(&self) -> Option<&Collection> {
        self.parent.as_deref()
    }

    pub fn path(&self) -> String {
        path_of(self.parent.as_ref(), &self.name)
    }

    /// Fetch the value at a dot-delimited data path inside the content.
    ///
    /// A purely numeric segment addresses a list index first, then a map
    /// key. An empty data path fetches the whole content. A missing numeric
    /// index is a server-side failure, not an insert point.
    pub fn fetch(&self, data_path: &str) -> Result<Value, OperationError> {
        let path = self.path();
        let response = self.db.execute(&Request::fetch(self.db.next_id(), &path, data_path));
        if !response.succeed() {
            return Err(OperationError::failed(
                "FETCH",
                path,
                format!(" with a data path of '{data_path}'"),
            ));
        }
        Ok(response.into_metadata())
    }

    /// Set the value at a dot-delimited data path inside the content.
    ///
    /// Same addressing as [`fetch`](Self::fetch), except a numeric segment
    /// whose list index does not exist falls back to inserting by map key.
    /// An empty data path replaces the whole content.
    pub fn set(&self, data_path: &str, value: Value) -> Result<(), OperationError> {
        let path = self.path();
        let response =
            self.db.execute(&Request::set(self.db.next_id(), &path, data_path, value));
        if !response.succeed() {
            return Err(OperationError::failed(
                "SET",
                path,
                format!(" with a data path of '{data_path}'"),
            ));
        }
        Ok(())
    }

    /// Shortcut for `fetch("")`.
    pub fn fetch_content(&self) -> Result<Value, OperationError> {
        self.fetch("")
    }

    /// Shortcut for `set("", value)`.
    pub fn set_content(&self, value: Value) -> Result<(), OperationError> {
        self.set("", value)
    }

    pub fn delete(&self) -> Result<(), OperationError> {
        delete_at(&self.db, self.path())
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document").field("path", &self.path()).finish()
    }
}

/// Handle to a remote collection.
#[derive(Clone)]
pub struct Collection {
    db: Database,
    parent: Option<Arc<Collection>>,
    name: String,
}

impl Collection {
    pub(crate) fn new(
        db: Database,
        parent: Option<Arc<Collection>>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            db,
            parent,
            name: name.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent(&self) -> Option<&Collection> {
        self.parent.as_deref()
    }

    pub fn path(&self) -> String {
        path_of(self.parent.as_ref(), &self.name)
    }

    /// List all child files.
    pub fn list(&self) -> Result<Vec<File>, OperationError> {
        self.list_with(None)
    }

    /// List child files matching a predicate.
    pub fn list_filtered(&self, filter: &Filter) -> Result<Vec<File>, OperationError> {
        self.list_with(Some(filter))
    }

    fn list_with(&self, filter: Option<&Filter>) -> Result<Vec<File>, OperationError> {
        let path = self.path();
        let response = self.db.execute(&Request::list(self.db.next_id(), &path, filter));
        if !response.succeed() {
            let detail = match filter {
                Some(filter) => format!(" with a filter of '{}'", filter.encode()),
                None => String::new(),
            };
            return Err(OperationError::failed("LIST", path, detail));
        }
        // Documents first, then collections, each in server order.
        let parent = Arc::new(self.clone());
        let mut files = Vec::new();
        for name in names_in(response.metadata(), "documents") {
            files.push(File::Document(Document::new(
                self.db.clone(),
                Some(parent.clone()),
                name,
            )));
        }
        for name in names_in(response.metadata(), "collections") {
            files.push(File::Collection(Collection::new(
                self.db.clone(),
                Some(parent.clone()),
                name,
            )));
        }
        Ok(files)
    }

    /// Resolve a direct child by name.
    ///
    /// An empty name short-circuits to an absent handle without a round
    /// trip.
    pub fn get(&self, name: &str) -> Result<File, OperationError> {
        if name.is_empty() {
            return Ok(File::None(AbsentFile {
                parent: Some(Arc::new(self.clone())),
                name: String::new(),
            }));
        }
        let path = format!("{}/{}", self.path(), name);
        let response = self.db.execute(&Request::get(self.db.next_id(), &path));
        if !response.succeed() {
            return Err(OperationError::failed("GET", path, ""));
        }
        let parent = Arc::new(self.clone());
        match response.metadata().as_str() {
            Some("none") => Ok(File::None(AbsentFile {
                parent: Some(parent),
                name: name.to_string(),
            })),
            Some("document") => Ok(File::Document(Document::new(
                self.db.clone(),
                Some(parent),
                name,
            ))),
            Some("collection") => Ok(File::Collection(Collection::new(
                self.db.clone(),
                Some(parent),
                name,
            ))),
            _ => Err(OperationError::invalid("GET", path, "")),
        }
    }

    /// Create a direct child. Ignored for an empty name.
    ///
    /// Without `force` the server refuses an existing name; with it, an
    /// existing entry of a different kind is replaced.
    pub fn create(&self, name: &str, kind: FileKind, force: bool) -> Result<(), OperationError> {
        if name.is_empty() {
            return Ok(());
        }
        create_at(&self.db, format!("{}/{}", self.path(), name), kind, force)
    }

    pub fn delete(&self) -> Result<(), OperationError> {
        delete_at(&self.db, self.path())
    }
}

impl fmt::Debug for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collection").field("path", &self.path()).finish()
    }
}

fn names_in<'a>(metadata: &'a Value, key: &str) -> impl Iterator<Item = &'a str> {
    metadata
        .get(key)
        .and_then(Value::as_array)
        .map(|list| list.as_slice())
        .unwrap_or(&[])
        .iter()
        .filter_map(Value::as_str)
}

pub(crate) fn delete_at(db: &Database, path: String) -> Result<(), OperationError> {
    let response = db.execute(&Request::delete(db.next_id(), &path));
    if !response.succeed() {
        return Err(OperationError::failed("DELETE", path, ""));
    }
    Ok(())
}

pub(crate) fn create_at(
    db: &Database,
    path: String,
    kind: FileKind,
    force: bool,
) -> Result<(), OperationError> {
    let response = db.execute(&Request::create(db.next_id(), &path, kind, force));
    if !response.succeed() {
        return Err(OperationError::failed(
            "CREATE",
            path,
            format!(
                " with a file type of '{}' and a force of '{}'",
                kind.as_str(),
                force
            ),
        ));
    }
    Ok(())
}

/// Build the handle chain for a GET that reported a document.
///
/// Every path segment but the last becomes an intermediate collection,
/// parented to the previous one; the root collection carries the store name.
/// An empty relative path means the root itself is the document.
pub(crate) fn document_chain(db: &Database, relative: &str) -> File {
    if relative.is_empty() {
        return File::Document(Document::new(db.clone(), None, db.name()));
    }
    let mut parent = Collection::new(db.clone(), None, db.name());
    let segments: Vec<&str> = relative.split('/').collect();
    for segment in &segments[..segments.len() - 1] {
        parent = Collection::new(db.clone(), Some(Arc::new(parent)), *segment);
    }
    File::Document(Document::new(
        db.clone(),
        Some(Arc::new(parent)),
        segments[segments.len() - 1],
    ))
}

/// Build the handle chain for a GET that reported a collection.
pub(crate) fn collection_chain(db: &Database, relative: &str) -> File {
    let mut collection = Collection::new(db.clone(), None, db.name());
    if !relative.is_empty() {
        for segment in relative.split('/') {
            collection = Collection::new(db.clone(), Some(Arc::new(collection)), segment);
        }
    }
    File::Collection(collection)
}
