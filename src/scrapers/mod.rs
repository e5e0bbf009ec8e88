//! Page scrapers for each Mars source.
//!
//! Each scraper pulls one piece of the final record and follows the same
//! contract: a missing element, a failed interaction or a failed fetch is
//! logged and turned into an absent value. No scraper returns an error.
//!
//! # Sources
//!
//! | Data | Module | Method | Notes |
//! |------|--------|--------|-------|
//! | Latest news | [`news`] | Browser session | First `div.list_text` block |
//! | Featured image | [`image`] | Browser session | Click reveals the full image |
//! | Facts table | [`facts`] | HTTP + HTML table | Does not touch the session |
//! | Hemispheres | [`hemispheres`] | Browser session | Click-through per catalog entry |

pub mod facts;
pub mod hemispheres;
pub mod image;
pub mod news;
