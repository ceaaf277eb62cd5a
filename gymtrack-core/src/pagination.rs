use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_SIZE: u32 = 50;

/// List envelope returned by every paginated endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub size: u32,
    pub pages: u32,
}

impl<T> Page<T> {
    /// Cuts one page out of an already-fetched list. Pages are 1-based.
    pub fn paginate(items: Vec<T>, page: u32, size: u32) -> Page<T> {
        let page = page.max(1);
        let size = size.max(1);
        let total = items.len() as u64;
        let pages = total.div_ceil(u64::from(size)) as u32;
        let skip = (page as usize - 1).saturating_mul(size as usize);
        let items = items.into_iter().skip(skip).take(size as usize).collect();
        Page {
            items,
            total,
            page,
            size,
            pages,
        }
    }

    pub fn has_next(&self) -> bool {
        self.page < self.pages
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            size: self.size,
            pages: self.pages,
        }
    }
}

/// Page selection plus any endpoint filters, sent as query parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageQuery {
    pub page: u32,
    pub size: u32,
    pub filters: Vec<(String, String)>,
}

impl Default for PageQuery {
    fn default() -> Self {
        Self {
            page: 1,
            size: DEFAULT_PAGE_SIZE,
            filters: Vec::new(),
        }
    }
}

impl PageQuery {
    pub fn new(page: u32, size: u32) -> Self {
        Self {
            page: page.max(1),
            size: size.max(1),
            filters: Vec::new(),
        }
    }

    pub fn filter(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.filters.push((key.into(), value.to_string()));
        self
    }

    pub fn next_page(&self) -> Self {
        Self {
            page: self.page + 1,
            ..self.clone()
        }
    }

    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut query = vec![
            ("page".to_string(), self.page.to_string()),
            ("size".to_string(), self.size.to_string()),
        ];
        query.extend(self.filters.iter().cloned());
        query
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn second_page_of_twenty_five() {
        let page = Page::paginate((1..=25).collect::<Vec<_>>(), 2, 10);
        assert_eq!(page.items, (11..=20).collect::<Vec<_>>());
        assert_eq!(page.total, 25);
        assert_eq!(page.pages, 3);
        assert!(page.has_next());
    }

    #[test]
    fn last_and_past_the_end_pages() {
        let last = Page::paginate((1..=25).collect::<Vec<_>>(), 3, 10);
        assert_eq!(last.items, vec![21, 22, 23, 24, 25]);
        assert!(!last.has_next());

        let beyond = Page::paginate((1..=25).collect::<Vec<_>>(), 9, 10);
        assert!(beyond.items.is_empty());
        assert_eq!(beyond.pages, 3);
    }

    #[test]
    fn zero_size_and_empty_input() {
        let page = Page::paginate(vec!['a', 'b'], 0, 0);
        assert_eq!((page.page, page.size, page.pages), (1, 1, 2));
        assert_eq!(page.items, vec!['a']);

        let empty: Page<u8> = Page::paginate(vec![], 1, 10);
        assert_eq!(empty.pages, 0);
        assert!(!empty.has_next());
    }

    #[test]
    fn query_lists_page_then_filters() {
        let q = PageQuery::new(2, 20).filter("exercise_id", 7);
        assert_eq!(
            q.to_query(),
            vec![
                ("page".to_string(), "2".to_string()),
                ("size".to_string(), "20".to_string()),
                ("exercise_id".to_string(), "7".to_string()),
            ]
        );
        assert_eq!(q.next_page().page, 3);
    }
}
