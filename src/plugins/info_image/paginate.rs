/// 分页结果
#[derive(Debug, Clone, PartialEq)]
pub struct Paginated<T> {
    pub records: Vec<T>,
    pub total_count: usize,
    pub current_page: usize,
    pub page_size: usize,
    pub total_pages: usize,
    pub has_next: bool,
    pub has_prev: bool,
}

impl<T> Paginated<T> {
    /// 第 i 条记录在全部记录中的序号 (从 1 开始)
    pub fn global_index(&self, i: usize) -> usize {
        self.current_page.saturating_sub(1) * self.page_size + i + 1
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// 切出第 `page` 页 (从 1 开始)
///
/// 页码超出范围时返回空页，`total_pages` 等元信息仍然正确；`page_size` 须不小于 1，
/// 传入 0 时按 1 处理。
pub fn paginate<T: Clone>(items: &[T], page: usize, page_size: usize) -> Paginated<T> {
    let page_size = page_size.max(1);
    let total_count = items.len();
    let total_pages = total_count.div_ceil(page_size);

    let start = page.saturating_sub(1).saturating_mul(page_size);
    let records = if page == 0 || start >= total_count {
        Vec::new()
    } else {
        let end = (start + page_size).min(total_count);
        items[start..end].to_vec()
    };

    Paginated {
        records,
        total_count,
        current_page: page,
        page_size,
        total_pages,
        has_next: page < total_pages,
        has_prev: page > 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_23_records_page_size_10() {
        let items: Vec<u32> = (1..=23).collect();

        let p1 = paginate(&items, 1, 10);
        assert_eq!(p1.records.len(), 10);
        assert_eq!(p1.total_pages, 3);
        assert!(!p1.has_prev);
        assert!(p1.has_next);

        let p3 = paginate(&items, 3, 10);
        assert_eq!(p3.records, vec![21, 22, 23]);
        assert!(p3.has_prev);
        assert!(!p3.has_next);

        let p4 = paginate(&items, 4, 10);
        assert!(p4.records.is_empty());
        assert_eq!(p4.total_pages, 3);
        assert!(p4.has_prev);
        assert!(!p4.has_next);
    }

    #[test]
    fn test_pages_concatenate_to_original() {
        for n in 0..30usize {
            let items: Vec<usize> = (0..n).collect();
            for size in 1..8usize {
                let total_pages = n.div_ceil(size);
                let mut joined = Vec::new();
                for page in 1..=total_pages {
                    let p = paginate(&items, page, size);
                    assert_eq!(p.records.len(), size.min(n - (page - 1) * size));
                    assert_eq!(p.has_prev, page != 1);
                    assert_eq!(p.has_next, page != total_pages);
                    joined.extend(p.records);
                }
                assert_eq!(joined, items);
            }
        }
    }

    #[test]
    fn test_global_index() {
        let items: Vec<u32> = (0..23).collect();
        let p = paginate(&items, 2, 10);
        assert_eq!(p.global_index(0), 11);
        assert_eq!(p.global_index(9), 20);
    }

    #[test]
    fn test_empty_and_degenerate_inputs() {
        let empty: Vec<u8> = Vec::new();
        let p = paginate(&empty, 1, 5);
        assert!(p.is_empty());
        assert_eq!(p.total_pages, 0);
        assert!(!p.has_next);

        let items = vec![1, 2, 3];
        let p = paginate(&items, 1, 0);
        assert_eq!(p.page_size, 1);
        assert_eq!(p.records, vec![1]);
        assert!(paginate(&items, 0, 2).is_empty());
    }
}
