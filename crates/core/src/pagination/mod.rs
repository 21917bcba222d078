//! Paginated listing detection and accumulation
//!
//! The catalog API wraps list results in a paging object:
//!
//! ```json
//! { "href": "...", "items": [ ... ], "limit": 20, "next": "...", "offset": 0, "total": 57 }
//! ```
//!
//! [`is_paginated`] recognizes such a response (any object with a `limit`
//! key). [`PageState`] then accumulates `items` across pages while remembering
//! the `next` link. Fetching the pages is left to the caller.

mod page;

pub use page::{is_paginated, PageError, PageShape, PageState};
