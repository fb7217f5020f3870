use crate::color::{MaybePaint, MODEL_KEY, SUMMARY};
use crate::{die, warn};

use contentreg::registry::relations::{Unresolved, UnresolvedRelation};
use contentreg::sources::Sources;
use contentreg::{collect_model_infos, create_manager, ModelInfo};
use std::collections::HashMap;

/// Keys declared by more than one source, with the number of declarations,
/// in the order they were first declared
fn shadowed_keys(infos: &[ModelInfo]) -> Vec<(&str, usize)> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut order = Vec::new();

    for info in infos {
        let count = counts.entry(info.key.as_str()).or_insert(0);

        if *count == 0 {
            order.push(info.key.as_str());
        }

        *count += 1;
    }

    order
        .into_iter()
        .map(|key| (key, counts[key]))
        .filter(|&(_, count)| count > 1)
        .collect()
}

fn describe_unresolved(relation: &UnresolvedRelation) -> String {
    let reason = match &relation.reason {
        Unresolved::Missing => "no such model is registered".to_string(),
        Unresolved::Ambiguous(candidates) => {
            format!("it could be any of {}", candidates.join(", "))
        }
    };

    format!(
        "relation \"{}\" of model \"{}\" targets \"{}\" but {}",
        relation.attribute, relation.source, relation.target, reason
    )
}

pub(crate) fn check_cmd(sources: &Sources) {
    let infos = collect_model_infos(sources);

    for (key, count) in shadowed_keys(&infos) {
        warn!(
            "model \"{}\" is declared {} times, the last declaration is used",
            key, count
        );
    }

    let registry = match create_manager(infos) {
        Ok(registry) => registry,
        Err(err) => die!("{}", err),
    };

    for relation in registry.unresolved() {
        warn!("{}", describe_unresolved(relation));
    }

    for key in registry.keys() {
        println!("{}", MODEL_KEY.maybe_paint(key));
    }

    let summary = format!(
        "{} models registered, {} unresolved relations",
        registry.len(),
        registry.unresolved().len()
    );

    println!("{}", SUMMARY.maybe_paint(summary.as_str()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_shadowed_keys() {
        let infos = vec![
            ModelInfo::new("blog.post", json!({})),
            ModelInfo::new("admin.role", json!({})),
            ModelInfo::new("auth.user", json!({})),
            ModelInfo::new("admin.role", json!({})),
            ModelInfo::new("blog.post", json!({})),
            ModelInfo::new("blog.post", json!({})),
        ];

        assert_eq!(
            shadowed_keys(&infos),
            vec![("blog.post", 3), ("admin.role", 2)]
        );
    }

    #[test]
    fn test_describe_unresolved() {
        let missing = UnresolvedRelation {
            source: "shop.order".to_string(),
            attribute: "coupon".to_string(),
            target: "coupon".to_string(),
            reason: Unresolved::Missing,
        };

        assert_eq!(
            describe_unresolved(&missing),
            "relation \"coupon\" of model \"shop.order\" targets \"coupon\" but no such model is registered"
        );

        let ambiguous = UnresolvedRelation {
            reason: Unresolved::Ambiguous(vec!["auth.user".to_string(), "admin.user".to_string()]),
            ..missing
        };

        assert!(describe_unresolved(&ambiguous).ends_with("any of auth.user, admin.user"));
    }
}
