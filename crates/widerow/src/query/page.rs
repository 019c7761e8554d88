//! Cursor pagination
//!
//! Continuation tokens wrap the store's ring-order value for the last row
//! of a page. A cursor is produced here and fed back verbatim via
//! `after`; there is no offset anywhere in this model, so walking pages
//! under concurrent writes neither skips nor repeats rows that existed
//! for the whole walk.

use tracing::debug;

use crate::client::StoreClient;
use crate::entity::Entity;
use crate::error::{MapperError, MapperResult};
use crate::executor::Executor;
use crate::query::builder::QueryBuilder;
use crate::query::compile::StatementCompiler;
use crate::schema::ROW_TOKEN_COLUMN;
use crate::value::StoreValue;

/// Opaque continuation token for resumable paging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCursor {
    token: i64,
}

impl PageCursor {
    pub(crate) fn new(token: i64) -> Self {
        Self { token }
    }

    pub(crate) fn token(&self) -> i64 {
        self.token
    }

    /// Hex wire form for carrying a cursor across a request boundary
    pub fn encode(&self) -> String {
        hex::encode(self.token.to_be_bytes())
    }

    /// Rebuild a cursor from its [`PageCursor::encode`] output
    pub fn decode(encoded: &str) -> MapperResult<Self> {
        let bytes = hex::decode(encoded)
            .map_err(|e| MapperError::InvalidCursor(e.to_string()))?;
        let bytes: [u8; 8] = bytes
            .try_into()
            .map_err(|_| MapperError::InvalidCursor("cursor must decode to 8 bytes".to_string()))?;
        Ok(Self {
            token: i64::from_be_bytes(bytes),
        })
    }
}

/// One page of entities plus the continuation for the next page.
///
/// `next` is `Some` exactly when the page came back full; a short page
/// means the walk is complete. A full final page costs one extra, empty
/// round trip to discover the end.
#[derive(Debug)]
pub struct Page {
    pub entities: Vec<Entity>,
    pub next: Option<PageCursor>,
}

impl QueryBuilder {
    /// Fetch one page of at most `page_size` rows.
    ///
    /// The compiled select carries the partition-ordering token for each
    /// row; the token of the last row becomes the continuation cursor.
    /// Feed it back through [`QueryBuilder::after`] to resume.
    pub async fn paginate(self, client: &dyn StoreClient, page_size: u32) -> MapperResult<Page> {
        let statement = StatementCompiler::new(&self.schema).select_page(&self.clauses, page_size)?;
        let bags = Executor::new(client).fetch(&statement).await?;
        let full_page = bags.len() as u64 == u64::from(page_size);

        let mut entities = Vec::with_capacity(bags.len());
        let mut last_token = None;
        for mut bag in bags {
            match bag.remove(ROW_TOKEN_COLUMN) {
                Some(StoreValue::Int(token)) => last_token = Some(token),
                Some(other) => {
                    return Err(MapperError::Hydration(format!(
                        "row token came back as {} instead of an integer",
                        other.type_name()
                    )));
                }
                None => {
                    return Err(MapperError::Hydration(
                        "paged reply is missing the row token".to_string(),
                    ));
                }
            }
            entities.push(Entity::hydrate(self.schema.clone(), bag)?);
        }

        let next = if full_page {
            last_token.map(PageCursor::new)
        } else {
            None
        };
        debug!(rows = entities.len(), has_next = next.is_some(), "page fetched");
        Ok(Page { entities, next })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_round_trips_through_hex() {
        for token in [0i64, 1, -1, i64::MAX, i64::MIN, 123_456_789] {
            let cursor = PageCursor::new(token);
            let decoded = PageCursor::decode(&cursor.encode()).unwrap();
            assert_eq!(decoded, cursor);
        }
    }

    #[test]
    fn encoded_form_is_sixteen_hex_digits() {
        assert_eq!(PageCursor::new(-1).encode(), "ffffffffffffffff");
        assert_eq!(PageCursor::new(255).encode(), "00000000000000ff");
    }

    #[test]
    fn malformed_cursors_fail_to_decode() {
        assert!(matches!(
            PageCursor::decode("zz"),
            Err(MapperError::InvalidCursor(_))
        ));
        assert!(matches!(
            PageCursor::decode("abcd"),
            Err(MapperError::InvalidCursor(_))
        ));
        assert!(matches!(
            PageCursor::decode(""),
            Err(MapperError::InvalidCursor(_))
        ));
        assert!(matches!(
            PageCursor::decode("00000000000000ff00"),
            Err(MapperError::InvalidCursor(_))
        ));
    }
}
