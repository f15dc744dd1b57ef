//! Category membership and category auto-derivation.
//!
//! Membership is tag based and not mutually exclusive: a collective lands in
//! every category whose tag (or alias) it carries. `ALL` holds every input
//! collective and is always first.
//!
//! Tags are compared after trimming and lowercasing.

use std::collections::{BTreeMap, HashMap, HashSet};

use horizons_common::{Category, CategoryTag, Collective, HostConfig};

/// Color used when `ALL` has to be synthesized without host settings.
pub const DEFAULT_ALL_COLOR: &str = "#725fed";

/// Tags considered in the first ranking pass of auto-derivation.
pub const CANDIDATE_TAGS: usize = 20;

/// Categories kept by auto-derivation (excluding `ALL`).
pub const DERIVED_CATEGORIES: usize = 6;

pub fn normalize_tag(tag: &str) -> String {
    tag.trim().to_lowercase()
}

/// Host-specific tag rules: aliases, excluded and pinned category tags.
#[derive(Debug, Clone, Default)]
pub struct TagPolicy {
    /// Group key -> member tags (normalized, key included).
    group_tags: BTreeMap<String, Vec<String>>,
    /// Member tag -> group key.
    group_of: HashMap<String, String>,
    exclude: HashSet<String>,
    /// Pinned category tags, trimmed but in their configured spelling.
    include: Vec<String>,
}

impl TagPolicy {
    pub fn new(
        group_tags: &BTreeMap<String, Vec<String>>,
        include: &[String],
        exclude: &[String],
    ) -> Self {
        let mut groups = BTreeMap::new();
        let mut group_of = HashMap::new();
        for (key, members) in group_tags {
            let key = normalize_tag(key);
            let mut normalized: Vec<String> = Vec::with_capacity(members.len() + 1);
            for tag in std::iter::once(&key).chain(members.iter()) {
                let tag = normalize_tag(tag);
                if !normalized.contains(&tag) {
                    normalized.push(tag);
                }
            }
            for tag in &normalized {
                group_of.entry(tag.clone()).or_insert_with(|| key.clone());
            }
            groups.insert(key, normalized);
        }

        Self {
            group_tags: groups,
            group_of,
            exclude: exclude.iter().map(|t| normalize_tag(t)).collect(),
            include: include
                .iter()
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .collect(),
        }
    }

    pub fn from_host(host: &HostConfig) -> Self {
        Self::new(
            &host.group_tags,
            &host.include_category_tags,
            &host.exclude_category_tags,
        )
    }

    /// The group key a normalized tag folds into, or the tag itself.
    pub fn canonical<'a>(&'a self, tag: &'a str) -> &'a str {
        self.group_of.get(tag).map(String::as_str).unwrap_or(tag)
    }

    /// Every normalized tag that counts as `tag` (the tag itself included).
    pub fn aliases(&self, tag: &str) -> Vec<String> {
        let tag = normalize_tag(tag);
        match self.group_tags.get(&tag) {
            Some(members) => members.clone(),
            None => vec![tag],
        }
    }

    pub fn is_excluded(&self, tag: &str) -> bool {
        self.exclude.contains(tag) || self.exclude.contains(self.canonical(tag))
    }
}

/// A category together with the collectives it currently holds.
#[derive(Debug, Clone)]
pub struct CategoryMembers<'a> {
    pub category: Category,
    pub collectives: Vec<&'a Collective>,
}

impl CategoryMembers<'_> {
    pub fn count(&self) -> usize {
        self.collectives.len()
    }
}

/// Copy of `categories` with exactly one `ALL` entry, placed first.
pub fn with_all_first(categories: &[Category], all_color: &str) -> Vec<Category> {
    let all = categories
        .iter()
        .find(|c| c.tag.is_all())
        .cloned()
        .unwrap_or_else(|| Category::all(all_color));
    std::iter::once(all)
        .chain(categories.iter().filter(|c| !c.tag.is_all()).cloned())
        .collect()
}

/// Bucket collectives into categories.
pub fn partition<'a>(
    collectives: &[&'a Collective],
    categories: &[Category],
    policy: &TagPolicy,
) -> Vec<CategoryMembers<'a>> {
    let collective_tags: Vec<HashSet<String>> = collectives
        .iter()
        .map(|c| c.membership_tags().iter().map(|t| normalize_tag(t)).collect())
        .collect();

    with_all_first(categories, DEFAULT_ALL_COLOR)
        .into_iter()
        .map(|category| {
            let members = match &category.tag {
                CategoryTag::All => collectives.to_vec(),
                CategoryTag::Tag(tag) => {
                    let mut accepted: HashSet<String> = policy.aliases(tag).into_iter().collect();
                    accepted.extend(category.extra_tags.iter().map(|t| normalize_tag(t)));
                    collectives
                        .iter()
                        .zip(&collective_tags)
                        .filter(|(_, tags)| tags.iter().any(|t| accepted.contains(t)))
                        .map(|(c, _)| *c)
                        .collect()
                }
            };
            CategoryMembers {
                category,
                collectives: members,
            }
        })
        .collect()
}

/// Derive categories from tag frequency when a snapshot ships none.
///
/// Pinned tags (`include_category_tags`) win outright. Otherwise:
/// 1. Rank tags by raw frequency, ties by first-seen order; keep the top
///    `CANDIDATE_TAGS`.
/// 2. Assign each collective to the first candidate (by rank) it carries and
///    count these exclusive assignments.
/// 3. Keep the `DERIVED_CATEGORIES` candidates with the highest exclusive
///    count, then order them by their raw frequency.
///
/// Counting reads the same tags as membership (`categoryTags` when present).
/// Aliased tags fold into their group key before counting; excluded tags are
/// never candidates.
pub fn derive_categories(
    collectives: &[Collective],
    policy: &TagPolicy,
    palette: &[String],
    all_color: &str,
) -> Vec<Category> {
    let color = |i: usize| {
        if palette.is_empty() {
            DEFAULT_ALL_COLOR.to_string()
        } else {
            palette[i % palette.len()].clone()
        }
    };
    let make = |i: usize, label: &str, tag: &str| {
        let mut category = Category::new(label, tag, color(i));
        category.extra_tags = policy
            .aliases(tag)
            .into_iter()
            .filter(|t| t != tag)
            .collect();
        category
    };

    let mut categories = vec![Category::all(all_color)];

    if !policy.include.is_empty() {
        categories.extend(
            policy
                .include
                .iter()
                .enumerate()
                .map(|(i, label)| make(i, label, &normalize_tag(label))),
        );
        return categories;
    }

    // Canonical, deduplicated, non-excluded tags per collective.
    let per_collective: Vec<Vec<String>> = collectives
        .iter()
        .map(|c| {
            let mut tags: Vec<String> = Vec::new();
            for tag in c.membership_tags() {
                let tag = normalize_tag(tag);
                if tag.is_empty() || policy.is_excluded(&tag) {
                    continue;
                }
                let canonical = policy.canonical(&tag).to_string();
                if !tags.contains(&canonical) {
                    tags.push(canonical);
                }
            }
            tags
        })
        .collect();

    // Pass 1: raw frequency, ties by first-seen order (stable sort).
    let mut frequency: Vec<(String, usize)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    for tags in &per_collective {
        for tag in tags {
            match index.get(tag) {
                Some(&i) => frequency[i].1 += 1,
                None => {
                    index.insert(tag.clone(), frequency.len());
                    frequency.push((tag.clone(), 1));
                }
            }
        }
    }
    frequency.sort_by(|a, b| b.1.cmp(&a.1));
    frequency.truncate(CANDIDATE_TAGS);

    // Pass 2: exclusive assignment to the first candidate by rank.
    let mut exclusive = vec![0usize; frequency.len()];
    for tags in &per_collective {
        if let Some(rank) = frequency.iter().position(|(t, _)| tags.contains(t)) {
            exclusive[rank] += 1;
        }
    }

    let mut chosen: Vec<usize> = (0..frequency.len()).collect();
    chosen.sort_by(|&a, &b| exclusive[b].cmp(&exclusive[a]));
    chosen.truncate(DERIVED_CATEGORIES);
    // Back to pass-1 order, which is raw frequency with first-seen ties.
    chosen.sort_unstable();

    tracing::debug!(
        candidates = frequency.len(),
        chosen = chosen.len(),
        "Derived categories from tag frequency"
    );

    categories.extend(
        chosen
            .into_iter()
            .enumerate()
            .map(|(i, rank)| {
                let tag = frequency[rank].0.as_str();
                make(i, tag, tag)
            }),
    );
    categories
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{category, collective, CollectiveExt};

    fn slugs_of(members: &CategoryMembers<'_>) -> Vec<String> {
        members.collectives.iter().map(|c| c.slug.clone()).collect()
    }

    fn labels(categories: &[Category]) -> Vec<&str> {
        categories.iter().map(|c| c.tag.as_str()).collect()
    }

    #[test]
    fn all_holds_everything_and_comes_first() {
        let list = vec![
            collective("a").tags(&["climate"]),
            collective("b").tags(&["education"]),
            collective("c"),
        ];
        let refs: Vec<&Collective> = list.iter().collect();
        let cats = vec![category("climate"), Category::all("#fff"), category("education")];
        let out = partition(&refs, &cats, &TagPolicy::default());

        assert!(out[0].category.tag.is_all());
        assert_eq!(out[0].category.color, "#fff");
        assert_eq!(slugs_of(&out[0]), vec!["a", "b", "c"]);
        assert_eq!(slugs_of(&out[1]), vec!["a"]);
        assert_eq!(slugs_of(&out[2]), vec!["b"]);
    }

    #[test]
    fn all_is_synthesized_when_missing() {
        let list = vec![collective("a")];
        let refs: Vec<&Collective> = list.iter().collect();
        let out = partition(&refs, &[category("climate")], &TagPolicy::default());
        assert_eq!(out.len(), 2);
        assert!(out[0].category.tag.is_all());
        assert_eq!(out[0].count(), 1);
        assert_eq!(out[1].count(), 0);
    }

    #[test]
    fn membership_is_not_exclusive_and_is_a_subset_of_all() {
        let list = vec![
            collective("a").tags(&["climate", "education"]),
            collective("b").tags(&["Education "]),
        ];
        let refs: Vec<&Collective> = list.iter().collect();
        let cats = vec![category("climate"), category("education")];
        let out = partition(&refs, &cats, &TagPolicy::default());

        assert_eq!(slugs_of(&out[1]), vec!["a"]);
        assert_eq!(slugs_of(&out[2]), vec!["a", "b"]);
        let all: HashSet<String> = slugs_of(&out[0]).into_iter().collect();
        for members in &out[1..] {
            assert!(slugs_of(members).iter().all(|s| all.contains(s)));
        }
    }

    #[test]
    fn category_tags_take_precedence_over_tags() {
        let mut c = collective("a").tags(&["climate"]);
        c.category_tags = Some(vec!["education".to_string()]);
        let list = vec![c];
        let refs: Vec<&Collective> = list.iter().collect();
        let out = partition(
            &refs,
            &[category("climate"), category("education")],
            &TagPolicy::default(),
        );
        assert_eq!(out[1].count(), 0);
        assert_eq!(out[2].count(), 1);
    }

    #[test]
    fn group_aliases_and_extra_tags_count_as_members() {
        let mut groups = BTreeMap::new();
        groups.insert(
            "climate".to_string(),
            vec!["climate".to_string(), "climate change".to_string()],
        );
        let policy = TagPolicy::new(&groups, &[], &[]);

        let list = vec![
            collective("a").tags(&["Climate Change"]),
            collective("b").tags(&["art"]),
        ];
        let refs: Vec<&Collective> = list.iter().collect();
        let mut arts = category("arts and culture");
        arts.extra_tags = vec!["art".to_string()];
        let out = partition(&refs, &[category("climate"), arts], &policy);

        assert_eq!(slugs_of(&out[1]), vec!["a"]);
        assert_eq!(slugs_of(&out[2]), vec!["b"]);
    }

    #[test]
    fn derive_uses_exclusive_counts_then_raw_frequency() {
        // Raw frequency: x=4, y=3, z=2, w=1.
        // Exclusive by rank: x takes a..d, y takes e, z takes nothing, w takes f.
        let list = vec![
            collective("a").tags(&["x", "y"]),
            collective("b").tags(&["x", "y"]),
            collective("c").tags(&["x", "z"]),
            collective("d").tags(&["x", "z"]),
            collective("e").tags(&["y"]),
            collective("f").tags(&["w"]),
        ];
        let palette = vec!["#1".to_string(), "#2".to_string()];
        let cats = derive_categories(&list, &TagPolicy::default(), &palette, "#all");

        assert_eq!(labels(&cats), vec!["ALL", "x", "y", "z", "w"]);
        assert_eq!(cats[0].color, "#all");
        assert_eq!(cats[1].color, "#1");
        assert_eq!(cats[2].color, "#2");
        assert_eq!(cats[3].color, "#1");
    }

    #[test]
    fn derive_keeps_six_by_exclusive_count() {
        // Eight tags, each collective carries one, so exclusive == raw.
        let mut list = Vec::new();
        for (i, tag) in ["a", "b", "c", "d", "e", "f", "g", "h"].iter().enumerate() {
            for n in 0..(10 - i) {
                list.push(collective(&format!("{tag}{n}")).tags(&[tag]));
            }
        }
        let cats = derive_categories(&list, &TagPolicy::default(), &[], DEFAULT_ALL_COLOR);
        assert_eq!(labels(&cats), vec!["ALL", "a", "b", "c", "d", "e", "f"]);
    }

    #[test]
    fn derive_prefers_primary_affiliation_over_raw_frequency() {
        // "shadow" is as frequent as "common" but always loses the exclusive
        // assignment to it, so it drops out.
        let mut list = Vec::new();
        for n in 0..7 {
            list.push(collective(&format!("c{n}")).tags(&["common", "shadow"]));
        }
        for (i, tag) in ["p", "q", "r", "s", "t", "u"].iter().enumerate() {
            for n in 0..(6 - i) {
                list.push(collective(&format!("{tag}{n}")).tags(&[tag]));
            }
        }
        // Raw: common=7, shadow=7, p=6, q=5, r=4, s=3, t=2, u=1.
        // Exclusive: common=7, shadow=0, p=6, q=5, r=4, s=3, t=2, u=1.
        let cats = derive_categories(&list, &TagPolicy::default(), &[], DEFAULT_ALL_COLOR);
        assert_eq!(labels(&cats), vec!["ALL", "common", "p", "q", "r", "s", "t"]);
    }

    #[test]
    fn derive_skips_excluded_and_folds_aliases() {
        let mut groups = BTreeMap::new();
        groups.insert(
            "climate".to_string(),
            vec!["climate change".to_string(), "climate justice".to_string()],
        );
        let policy = TagPolicy::new(&groups, &[], &["online".to_string()]);
        let list = vec![
            collective("a").tags(&["online", "climate change"]),
            collective("b").tags(&["online", "climate justice"]),
            collective("c").tags(&["online", "music"]),
        ];
        let cats = derive_categories(&list, &policy, &[], DEFAULT_ALL_COLOR);
        assert_eq!(labels(&cats), vec!["ALL", "climate", "music"]);
        assert_eq!(
            cats[1].extra_tags,
            vec!["climate change".to_string(), "climate justice".to_string()]
        );
    }

    #[test]
    fn pinned_tags_skip_derivation() {
        let policy = TagPolicy::new(&BTreeMap::new(), &["Civic Tech".to_string()], &[]);
        let list = vec![collective("a").tags(&["music"])];
        let cats = derive_categories(&list, &policy, &["#c".to_string()], DEFAULT_ALL_COLOR);
        assert_eq!(labels(&cats), vec!["ALL", "civic tech"]);
        assert_eq!(cats[1].label, "Civic Tech");
        assert_eq!(cats[1].color, "#c");
    }

    #[test]
    fn derive_counts_the_tags_membership_reads() {
        let with_category_tags = |slug: &str, category_tags: &[&str]| {
            let mut c = collective(slug).tags(&["chicago", "music"]);
            c.category_tags = Some(category_tags.iter().map(|t| t.to_string()).collect());
            c
        };
        let list = vec![
            with_category_tags("a", &["music"]),
            with_category_tags("b", &["music"]),
            with_category_tags("c", &["music"]),
            with_category_tags("d", &[]),
        ];
        let cats = derive_categories(&list, &TagPolicy::default(), &[], DEFAULT_ALL_COLOR);
        assert_eq!(labels(&cats), vec!["ALL", "music"]);

        let refs: Vec<&Collective> = list.iter().collect();
        let out = partition(&refs, &cats, &TagPolicy::default());
        assert_eq!(out[0].count(), 4);
        assert!(out.iter().all(|members| members.count() > 0));
    }
}
