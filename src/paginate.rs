use crate::fragment::{Fragment, Fragments};

/// Limit and offset. Only an absent value suppresses its clause; zero is
/// emitted like any other bound.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

impl Pagination {
    pub fn limit(&mut self, limit: u64) {
        self.limit = Some(limit);
    }

    pub fn offset(&mut self, offset: u64) {
        self.offset = Some(offset);
    }

    /// Zero-based `page` of `per_page` rows.
    pub fn paginate(&mut self, page: u64, per_page: u64) {
        self.limit = Some(per_page);
        self.offset = Some(page.saturating_mul(per_page));
    }

    pub(crate) fn push(&self, out: &mut Fragments) {
        if let Some(limit) = self.limit {
            out.push_sql("LIMIT").push(Fragment::value(limit));
        }
        if let Some(offset) = self.offset {
            out.push_sql("OFFSET").push(Fragment::value(offset));
        }
    }
}
