//! Header/footer detection and removal.
//!
//! Recurring page furniture is found by matching the edge content of
//! neighboring pages. One raw header per page is built from everything
//! near the margins; three-page runs with identical matches become
//! canonical headers (two pages can agree by accident, three rarely do);
//! position-equivalent canonical headers are gathered; every leftover
//! raw header is assigned to the canonical header it overlaps best. The
//! whole detection runs once over all pages and once per page parity,
//! because some documents alternate header layout on odd/even pages.
//! Matched regions are finally removed through a per-page green zone.

use indexmap::IndexMap;
use itertools::Itertools;
use rustc_hash::FxHashSet;

use crate::config::HeaderParams;
use crate::layout::{Element, Page};
use crate::utils::{HasBBox, Rect, is_same_rect, is_same_span, normalize_match_text};

/// Element-to-element match between two headers: ordinal in the first
/// header to ordinal in the second. Insertion order is significant.
type ElementMatch = IndexMap<usize, usize>;

/// Strict and position-only similarity between two elements. Strict
/// matching also compares normalized text, which tolerates a larger
/// position error; position-only matching compares start corners tightly.
fn is_similar_element(a: &Element, b: &Element, abs_tol: f64) -> (bool, bool) {
    if !a.same_kind(b) {
        return (false, false);
    }
    match (a.as_text(), b.as_text()) {
        (Some(ta), Some(tb)) => {
            if is_same_span((a.x0(), a.y0()), (b.x0(), b.y0()), abs_tol) {
                let mut same_content = false;
                if is_same_span((a.x1(), a.y1()), (b.x1(), b.y1()), abs_tol) {
                    same_content =
                        normalize_match_text(&ta.get_text()) == normalize_match_text(&tb.get_text());
                }
                (same_content, true)
            } else {
                (false, false)
            }
        }
        _ => {
            let same_pos = is_same_rect(a.bbox(), b.bbox(), abs_tol);
            (same_pos, same_pos)
        }
    }
}

/// One recurring header/footer instance: its elements, and for every
/// page it covers, the ordinals those elements had on that page.
#[derive(Debug, Clone)]
pub struct Header {
    elements: Vec<Element>,
    refs: IndexMap<usize, Vec<Option<usize>>>,
}

impl Header {
    fn new(elements: Vec<Element>, page: usize, indices: Vec<usize>) -> Self {
        let mut refs = IndexMap::new();
        refs.insert(page, indices.into_iter().map(Some).collect());
        Self { elements, refs }
    }

    pub fn page_count(&self) -> usize {
        self.refs.len()
    }

    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    fn first_page(&self) -> Option<usize> {
        self.refs.keys().next().copied()
    }

    /// Matches this header's elements against another's. With `strict`,
    /// content must agree (so a larger position error is tolerated);
    /// without, only start positions are compared, tightly.
    fn matches(&self, other: &Header, strict: bool) -> ElementMatch {
        let mut matched = ElementMatch::new();
        for (e1, el1) in self.elements.iter().enumerate() {
            for (e2, el2) in other.elements.iter().enumerate() {
                if matched.values().any(|v| *v == e2) {
                    continue;
                }
                let abs_tol = if strict { 3.0 } else { 0.1 };
                let (match_strict, match_pos) = is_similar_element(el1, el2, abs_tol);
                if (strict && match_strict) || (!strict && match_pos) {
                    matched.insert(e1, e2);
                }
            }
        }
        matched
    }

    /// Greedy best-overlap matching, used once canonical headers exist
    /// and leftovers only need a home, not an exact twin.
    fn overlap_matches(&self, other: &Header) -> ElementMatch {
        let mut matched = ElementMatch::new();
        for (e1, el1) in self.elements.iter().enumerate() {
            let c1 = el1.component();
            let mut best = 0.0f64;
            let mut best_id = None;
            for (e2, el2) in other.elements.iter().enumerate() {
                if matched.values().any(|v| *v == e2) {
                    continue;
                }
                let c2 = el2.component();
                let overlap = c1.hoverlap(&c2) * c1.voverlap(&c2);
                if overlap > best {
                    best = overlap;
                    best_id = Some(e2);
                }
            }
            if let Some(e2) = best_id {
                matched.insert(e1, e2);
            }
        }
        matched
    }

    /// Merges another header into this one. Only matched elements
    /// survive; their boxes grow to the union, and page references from
    /// both sides are kept.
    fn merge(&mut self, other: Header, matched: &ElementMatch) {
        let mut common: Vec<Element> = Vec::new();
        let mut new_refs: IndexMap<usize, Vec<Option<usize>>> = IndexMap::new();
        for page in self.refs.keys().chain(other.refs.keys()) {
            new_refs.entry(*page).or_default();
        }

        for (&e1, &e2) in matched.iter() {
            let mut element = self.elements[e1].clone();
            let union: Rect = (
                self.elements[e1].x0().min(other.elements[e2].x0()),
                self.elements[e1].y0().min(other.elements[e2].y0()),
                self.elements[e1].x1().max(other.elements[e2].x1()),
                self.elements[e1].y1().max(other.elements[e2].y1()),
            );
            element.set_bbox(union);
            common.push(element);

            for (page, refs) in &self.refs {
                let value = refs.get(e1).copied().flatten();
                new_refs.get_mut(page).unwrap().push(value);
            }
            for (page, refs) in &other.refs {
                let value = refs.get(e2).copied().flatten();
                new_refs.get_mut(page).unwrap().push(value);
            }
        }
        self.elements = common;
        self.refs = new_refs;
    }

    /// Like merge, but keeps this header's elements untouched and only
    /// adopts the other header's page references. Unmatched ordinals are
    /// padded out as absent.
    fn assign(&mut self, other: &Header, matched: &ElementMatch) {
        let mut new_refs: IndexMap<usize, Vec<Option<usize>>> = IndexMap::new();
        for page in other.refs.keys() {
            new_refs.insert(*page, Vec::new());
        }
        for (&e1, &e2) in matched.iter() {
            for (page, refs) in &other.refs {
                let list = new_refs.get_mut(page).unwrap();
                while list.len() < e1 {
                    list.push(None);
                }
                list.push(refs.get(e2).copied().flatten());
            }
        }
        for (page, refs) in new_refs {
            self.refs.insert(page, refs);
        }
    }
}

/// Runs detection and removal over the whole document.
pub fn run(pages: &mut Vec<Page>, params: &HeaderParams) {
    let headers = detect_headers(pages, params);
    log::debug!("detected {} canonical header(s)", headers.len());
    remove_headers(pages, &headers);
}

/// One raw header per non-empty page: every element whose box leaves the
/// inner content rectangle defined by the margins.
fn create_raw_headers(pages: &[Page], margins: &[f64; 4]) -> Vec<Header> {
    let mut headers = Vec::new();
    for (p, page) in pages.iter().enumerate() {
        if page.is_empty() {
            continue;
        }
        let top = page.height - page.height * margins[0];
        let bottom = page.height * margins[2];
        let right = page.width - page.width * margins[1];
        let left = page.width * margins[3];

        let mut material = Vec::new();
        let mut indices = Vec::new();
        for (e, elem) in page.iter().enumerate() {
            if elem.x1() < left || elem.x0() > right || elem.y1() < bottom || elem.y0() > top {
                material.push(elem.clone());
                indices.push(e);
            }
        }
        if !material.is_empty() {
            headers.push(Header::new(material, p, indices));
        }
    }
    headers
}

/// Scans raw-header triples for runs with identical matches, merges the
/// best-scoring run into one canonical header, and removes its members
/// from the raw pool. Returns the merged header, if any run was found.
fn group_matching_trio(raw: &mut Vec<Header>) -> Option<Header> {
    if raw.len() < 3 {
        return None;
    }

    let mut to_merge: Vec<Vec<usize>> = Vec::new();
    let mut scores: Vec<usize> = Vec::new();
    let mut carried: Option<ElementMatch> = None;
    let mut in_run = false;

    for idx in 0..raw.len() - 2 {
        let (prev, curr, next) = (&raw[idx], &raw[idx + 1], &raw[idx + 2]);
        let pc = carried.take().unwrap_or_else(|| prev.matches(curr, true));
        let cn = curr.matches(next, true);

        let pc_values: FxHashSet<usize> = pc.values().copied().collect();
        let cn_keys: FxHashSet<usize> = cn.keys().copied().collect();
        if pc_values == cn_keys {
            // The same elements of curr match both neighbors; the run
            // holds only if prev and next agree on those elements too.
            let pn = prev.matches(next, true);
            let pc_keys: FxHashSet<usize> = pc.keys().copied().collect();
            let pn_keys: FxHashSet<usize> = pn.keys().copied().collect();
            if pc_keys == pn_keys {
                if in_run {
                    to_merge.last_mut().unwrap().push(idx + 2);
                } else {
                    to_merge.push(vec![idx, idx + 1, idx + 2]);
                    scores.push(pn.len());
                }
                in_run = true;
            } else {
                in_run = false;
            }
        } else {
            in_run = false;
        }
        carried = Some(cn);
    }

    if scores.is_empty() {
        return None;
    }
    let mut best = 0usize;
    for (i, score) in scores.iter().enumerate() {
        if *score > scores[best] {
            best = i;
        }
    }

    let mut header: Option<Header> = None;
    for &i in to_merge[best].iter().rev() {
        let taken = raw.remove(i);
        match header.as_mut() {
            None => header = Some(taken),
            Some(h) => {
                let matched = h.matches(&taken, true);
                h.merge(taken, &matched);
            }
        }
    }
    header
}

/// Extracts every canonical header the trio scan can find. The raw pool
/// shrinks as runs are claimed.
fn extract_canonical(raw: &mut Vec<Header>) -> Vec<Header> {
    let mut headers = Vec::new();
    while let Some(header) = group_matching_trio(raw) {
        headers.push(header);
    }
    headers
}

/// Gathers position-equivalent canonical headers: when an area-overlap
/// match covers every element of one header, the two describe the same
/// furniture and their page references are unioned.
fn gather_headers(headers: Vec<Header>) -> Vec<Header> {
    let n = headers.len();
    let mut groups: Vec<std::collections::BTreeSet<usize>> = Vec::new();
    for (i1, i2) in (0..n).tuple_combinations::<(_, _)>() {
        if headers[i1].overlap_matches(&headers[i2]).len() == headers[i1].elements.len() {
            match groups.iter().position(|g| g.contains(&i1) || g.contains(&i2)) {
                Some(g) => {
                    groups[g].insert(i1);
                    groups[g].insert(i2);
                }
                None => {
                    groups.push(std::collections::BTreeSet::from([i1, i2]));
                }
            }
        }
    }

    let mut slots: Vec<Option<Header>> = headers.into_iter().map(Some).collect();
    let mut gathered = Vec::new();
    for group in &groups {
        let mut base: Option<Header> = None;
        for &idx in group {
            let Some(taken) = slots[idx].take() else {
                continue;
            };
            match base.as_mut() {
                None => base = Some(taken),
                Some(b) => {
                    let matched = b.overlap_matches(&taken);
                    b.assign(&taken, &matched);
                }
            }
        }
        if let Some(base) = base {
            gathered.push(base);
        }
    }
    gathered.extend(slots.into_iter().flatten());
    gathered
}

/// Assigns every remaining raw header to the canonical header it
/// resembles most by overlap.
fn assign_raw_headers(headers: &mut [Header], raw: Vec<Header>) {
    for leftover in raw {
        let mut best = 0usize;
        let mut best_score = 0usize;
        for (i, header) in headers.iter().enumerate() {
            let score = leftover.overlap_matches(header).len();
            if score > best_score {
                best_score = score;
                best = i;
            }
        }
        let matched = headers[best].overlap_matches(&leftover);
        headers[best].assign(&leftover, &matched);
    }
}

/// Last resort for short or irregular documents: chain-merge every raw
/// header on position alone. A single raw header means no header at all.
fn brute_force_position_match(mut raw: Vec<Header>) -> Vec<Header> {
    if raw.len() <= 1 {
        return Vec::new();
    }
    let mut header = raw.remove(0);
    for other in raw {
        let matched = header.matches(&other, false);
        header.merge(other, &matched);
    }
    vec![header]
}

/// Full detection: unified and odd/even passes, gathering, assignment,
/// and the brute-force fallback.
fn detect_headers(pages: &[Page], params: &HeaderParams) -> Vec<Header> {
    let mut raw = create_raw_headers(pages, &params.margins);
    let mut even_raw: Vec<Header> = create_raw_headers(pages, &params.margins)
        .into_iter()
        .filter(|h| h.first_page().is_some_and(|p| p % 2 == 0))
        .collect();
    let mut odd_raw: Vec<Header> = create_raw_headers(pages, &params.margins)
        .into_iter()
        .filter(|h| h.first_page().is_some_and(|p| p % 2 == 1))
        .collect();

    let mut headers = gather_headers(extract_canonical(&mut raw));
    let even_headers = gather_headers(extract_canonical(&mut even_raw));
    let odd_headers = gather_headers(extract_canonical(&mut odd_raw));

    // Keep whichever split explains more edge content as headers.
    if even_raw.len() + odd_raw.len() < raw.len() {
        let mut split = even_headers;
        split.extend(odd_headers);
        headers = gather_headers(split);
        raw = even_raw;
        raw.extend(odd_raw);
    }

    if !headers.is_empty() {
        assign_raw_headers(&mut headers, raw);
        headers
    } else {
        brute_force_position_match(raw)
    }
}

/// Computes the retained rectangle for one page: for each header element
/// on it, push in the page side whose advance disturbs the fewest
/// non-header elements.
fn compute_green_zone(page: &Page, indices: &[Option<usize>]) -> Rect {
    let mut top = 0.0f64;
    let mut right = 0.0f64;
    let mut bottom = 0.0f64;
    let mut left = 0.0f64;

    let index_set: FxHashSet<usize> = indices.iter().copied().flatten().collect();
    for idx in indices.iter().copied().flatten() {
        let Some(element) = page.get(idx) else {
            continue;
        };
        let others = || {
            page.iter()
                .enumerate()
                .filter(|&(e, _)| !index_set.contains(&e))
                .map(|(_, el)| el)
        };
        let top_impact = others().filter(|el| el.y1() >= element.y0()).count();
        let right_impact = others().filter(|el| el.x1() >= element.x0()).count();
        let bottom_impact = others().filter(|el| el.y0() <= element.y1()).count();
        let left_impact = others().filter(|el| el.x0() <= element.x1()).count();
        let least = top_impact
            .min(right_impact)
            .min(bottom_impact)
            .min(left_impact);

        if least == top_impact {
            top = top.max(page.height - element.y0());
        } else if least == bottom_impact {
            bottom = bottom.max(element.y1());
        } else if least == left_impact {
            left = left.max(element.x1());
        } else {
            right = right.max(page.width - element.x0());
        }
    }

    (left, bottom, page.width - right, page.height - top)
}

/// Deletes everything outside each referenced page's green zone.
fn remove_headers(pages: &mut [Page], headers: &[Header]) {
    for header in headers {
        for (p, indices) in &header.refs {
            let Some(page) = pages.get_mut(*p) else {
                continue;
            };
            let zone = compute_green_zone(page, indices);
            page.remove_where(|el| {
                !(el.x0() > zone.0 && el.x1() < zone.2 && el.y0() > zone.1 && el.y1() < zone.3)
            });
        }
    }
}
