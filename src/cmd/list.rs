//! `-l` command listing: usable methods per daemon with one-line usage.

use crate::registry::{MethodRegistry, UNUSABLE_FLAGS, chain, wallet};

static CATEGORIES: [(&str, &dyn MethodRegistry); 2] = [
    ("Chain Server Commands:", &chain::REGISTRY),
    ("Wallet Server Commands (--wallet):", &wallet::REGISTRY),
];

pub fn list_commands() -> String {
    let mut out = String::new();
    for &(header, registry) in &CATEGORIES {
        out.push_str(header);
        out.push('\n');
        for line in usable_usages(registry) {
            out.push_str(&line);
            out.push('\n');
        }
        out.push('\n');
    }
    out
}

/// Sorted usage lines, skipping methods this client cannot issue.
fn usable_usages(registry: &dyn MethodRegistry) -> Vec<String> {
    let mut names = registry.method_names();
    names.sort_unstable();
    names
        .into_iter()
        .filter(|name| {
            registry
                .usage_flags(name)
                .is_some_and(|flags| !flags.intersects(UNUSABLE_FLAGS))
        })
        .filter_map(|name| registry.usage_text(name))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listing_has_both_sections_in_order() {
        let text = list_commands();
        let chain_at = text.find("Chain Server Commands:").unwrap();
        let wallet_at = text.find("Wallet Server Commands (--wallet):").unwrap();
        assert!(chain_at < wallet_at);
        assert!(text.contains("\ngetblockcount\n"));
        assert!(text.contains("\ngetbalance (\"account\" minconf=1)\n"));
    }

    #[test]
    fn listing_skips_unusable() {
        let text = list_commands();
        assert!(!text.contains("notifyblocks"));
        assert!(!text.contains("blockconnected"));
    }

    #[test]
    fn usages_are_sorted() {
        let lines = usable_usages(&chain::REGISTRY);
        let mut sorted = lines.clone();
        sorted.sort();
        assert_eq!(lines, sorted);
    }
}
