//! Display order for collections.
//!
//! Date-ranged records (experience, education) follow the timeline: ongoing
//! records come first, most recently started first. Concluded records follow,
//! most recently concluded first. Remaining ties are broken by start date
//! (descending) and then identifier (ascending), so the order is total and
//! does not depend on the order the loader returned.
//!
//! Every other collection is ordered by its `display_order` attribute, with
//! records lacking one placed last, then by identifier.

use std::cmp::Ordering;
use thiserror::Error;

use crate::content::{ContentEntity, DateRange};

/// Anything that can be placed on the timeline.
pub trait Chronological {
    fn record_id(&self) -> i64;
    fn date_range(&self) -> &DateRange;
}

/// An entity of a dated resource was supplied without a date range.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Record {id} has no date range")]
pub struct MissingDateRange {
    pub id: i64,
}

/// Compare two records by timeline position.
pub fn compare<T: Chronological>(a: &T, b: &T) -> Ordering {
    let (ra, rb) = (a.date_range(), b.date_range());

    let primary = match (ra.end_date(), rb.end_date()) {
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (None, None) => Ordering::Equal,
        (Some(ea), Some(eb)) => eb.cmp(&ea),
    };

    primary
        .then_with(|| rb.start_date().cmp(&ra.start_date()))
        .then_with(|| a.record_id().cmp(&b.record_id()))
}

/// Sort records into display order.
pub fn order<T: Chronological>(mut records: Vec<T>) -> Vec<T> {
    records.sort_by(compare);
    records
}

struct Dated {
    range: DateRange,
    entity: ContentEntity,
}

impl Chronological for Dated {
    fn record_id(&self) -> i64 {
        self.entity.id
    }

    fn date_range(&self) -> &DateRange {
        &self.range
    }
}

/// Order raw entities of a dated resource.
///
/// Every entity must carry a date range; the first one without is reported.
pub fn order_entities(entities: Vec<ContentEntity>) -> Result<Vec<ContentEntity>, MissingDateRange> {
    let dated = entities
        .into_iter()
        .map(|entity| match entity.dates {
            Some(range) => Ok(Dated { range, entity }),
            None => Err(MissingDateRange { id: entity.id }),
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(order(dated).into_iter().map(|dated| dated.entity).collect())
}

/// Attribute holding the curated position of a record within its collection.
pub const DISPLAY_ORDER: &str = "display_order";

/// Order records of an undated collection by `display_order`, then id.
///
/// A missing or non-integer `display_order` sorts after every numbered record.
pub fn order_by_display(mut entities: Vec<ContentEntity>) -> Vec<ContentEntity> {
    entities.sort_by_key(|entity| {
        let position = entity
            .attributes
            .get(DISPLAY_ORDER)
            .and_then(|value| value.as_i64());
        (position.is_none(), position, entity.id)
    });
    entities
}
