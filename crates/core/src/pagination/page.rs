use serde_json::Value;
use thiserror::Error;

/// A response body that cannot be folded into a paged listing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PageError {
    /// The body is neither a paging object nor a bare list
    #[error("unexpected page shape: {0}")]
    UnexpectedShape(String),
    /// `next` is present but not a string or null
    #[error("invalid next link: {0}")]
    InvalidNext(String),
}

/// True when `body` is a paging object (a JSON object carrying `limit`).
#[must_use]
pub fn is_paginated(body: &Value) -> bool {
    body.as_object().is_some_and(|object| object.contains_key("limit"))
}

/// Shape of one page in a listing walk.
#[derive(Debug, Clone, PartialEq)]
pub enum PageShape {
    /// Paging object with its items and optional link to the next page
    Page {
        /// Items on this page
        items: Vec<Value>,
        /// Link to the next page; `None` on the last page
        next: Option<String>,
    },
    /// Plain JSON array, which ends the walk
    BareList(Vec<Value>),
}

impl PageShape {
    /// Classify a page body.
    ///
    /// # Errors
    ///
    /// [`PageError`] for objects without an `items` array, non-string `next`
    /// values and any non-container JSON.
    pub fn classify(body: Value) -> Result<Self, PageError> {
        match body {
            Value::Array(items) => Ok(Self::BareList(items)),
            Value::Object(mut object) => {
                let items = match object.remove("items") {
                    Some(Value::Array(items)) => items,
                    Some(other) => {
                        return Err(PageError::UnexpectedShape(format!(
                            "`items` is {}",
                            json_kind(&other)
                        )))
                    }
                    None => {
                        return Err(PageError::UnexpectedShape(
                            "object without `items`".to_string(),
                        ))
                    }
                };
                let next = match object.remove("next") {
                    None | Some(Value::Null) => None,
                    Some(Value::String(link)) if link.is_empty() => None,
                    Some(Value::String(link)) => Some(link),
                    Some(other) => return Err(PageError::InvalidNext(json_kind(&other).to_string())),
                };
                Ok(Self::Page { items, next })
            }
            other => Err(PageError::UnexpectedShape(json_kind(&other).to_string())),
        }
    }
}

/// Items accumulated over one logical paged fetch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageState {
    items: Vec<Value>,
    next_link: Option<String>,
    pages: usize,
}

impl PageState {
    /// Start a walk from the first page.
    ///
    /// # Errors
    ///
    /// See [`PageShape::classify`].
    pub fn from_first_page(body: Value) -> Result<Self, PageError> {
        let mut state = Self::default();
        state.absorb(body)?;
        Ok(state)
    }

    /// Append the items of another page, in encounter order.
    ///
    /// A bare list is appended and ends the walk.
    ///
    /// # Errors
    ///
    /// See [`PageShape::classify`].
    pub fn absorb(&mut self, body: Value) -> Result<(), PageError> {
        match PageShape::classify(body)? {
            PageShape::Page { items, next } => {
                self.items.extend(items);
                self.next_link = next;
            }
            PageShape::BareList(items) => {
                self.items.extend(items);
                self.next_link = None;
            }
        }
        self.pages += 1;
        Ok(())
    }

    /// Link to the page still to fetch, if any.
    #[must_use]
    pub fn next_link(&self) -> Option<&str> {
        self.next_link.as_deref()
    }

    /// Whether the walk has reached the end.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.next_link.is_none()
    }

    /// Number of pages absorbed so far.
    #[must_use]
    pub fn pages(&self) -> usize {
        self.pages
    }

    /// Items accumulated so far.
    #[must_use]
    pub fn items(&self) -> &[Value] {
        &self.items
    }

    /// Consume the state, yielding all accumulated items.
    #[must_use]
    pub fn into_items(self) -> Vec<Value> {
        self.items
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
