//! Command resolution across the chain and wallet registries.

use crate::error::CtlError;
use crate::registry::{
    Command, MethodRegistry, Namespace, UNUSABLE_FLAGS, UsageFlags, chain, wallet,
};

/// Registries in lookup priority order.
pub fn registries() -> [&'static dyn MethodRegistry; 2] {
    [&chain::REGISTRY, &wallet::REGISTRY]
}

/// A method bound to the registry that owns it.
#[derive(Clone, Copy)]
pub struct MethodDescriptor<'a> {
    registry: &'a dyn MethodRegistry,
    name: &'a str,
    flags: UsageFlags,
}

impl<'a> MethodDescriptor<'a> {
    pub fn name(&self) -> &'a str {
        self.name
    }

    pub fn namespace(&self) -> Namespace {
        self.registry.namespace()
    }

    pub fn flags(&self) -> UsageFlags {
        self.flags
    }

    pub fn usage_text(&self) -> Option<String> {
        self.registry.usage_text(self.name)
    }

    pub fn construct(&self, args: &[String]) -> Result<Command, CtlError> {
        self.registry.construct(self.name, args)
    }
}

impl std::fmt::Debug for MethodDescriptor<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MethodDescriptor")
            .field("name", &self.name)
            .field("namespace", &self.namespace())
            .field("flags", &self.flags)
            .finish()
    }
}

pub fn resolve(name: &str) -> Result<MethodDescriptor<'_>, CtlError> {
    resolve_in(&registries(), name)
}

/// Look `name` up in each registry in order; the first hit wins.
pub fn resolve_in<'a>(
    registries: &[&'a dyn MethodRegistry],
    name: &'a str,
) -> Result<MethodDescriptor<'a>, CtlError> {
    let (registry, flags) = registries
        .iter()
        .find_map(|r| r.usage_flags(name).map(|flags| (*r, flags)))
        .ok_or_else(|| CtlError::UnknownCommand(name.to_string()))?;

    if flags.intersects(UNUSABLE_FLAGS) {
        return Err(CtlError::UnusableCommand(name.to_string()));
    }

    tracing::debug!(method = name, namespace = %registry.namespace(), "resolved command");
    Ok(MethodDescriptor {
        registry,
        name,
        flags,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::ParamKind::Str;
    use crate::registry::{MethodSpec, StaticRegistry, method, notification, req, ws_method};

    static CHAIN: &[MethodSpec] = &[
        method("getinfo", &[]),
        method("getblockcount", &[]),
        ws_method("notifyblocks", &[]),
    ];
    static WALLET: &[MethodSpec] = &[
        method("getinfo", &[]),
        method("getbalance", &[]),
        notification("walletnote", &[req("n", Str)]),
    ];
    static CHAIN_REG: StaticRegistry = StaticRegistry::new(Namespace::Chain, CHAIN);
    static WALLET_REG: StaticRegistry = StaticRegistry::new(Namespace::Wallet, WALLET);

    fn pair() -> [&'static dyn MethodRegistry; 2] {
        [&CHAIN_REG, &WALLET_REG]
    }

    #[test]
    fn chain_only_resolves_to_chain() {
        let d = resolve_in(&pair(), "getblockcount").unwrap();
        assert_eq!(d.namespace(), Namespace::Chain);
    }

    #[test]
    fn wallet_only_resolves_to_wallet() {
        let d = resolve_in(&pair(), "getbalance").unwrap();
        assert_eq!(d.namespace(), Namespace::Wallet);
        assert_eq!(d.name(), "getbalance");
        assert_eq!(d.flags(), UsageFlags::WALLET_ONLY);
        let d = resolve_in(&pair(), "getblockcount").unwrap();
        assert!(d.flags().is_empty());
    }

    #[test]
    fn shared_name_prefers_chain() {
        for _ in 0..3 {
            let d = resolve_in(&pair(), "getinfo").unwrap();
            assert_eq!(d.namespace(), Namespace::Chain);
        }
    }

    #[test]
    fn unknown_name_fails() {
        let err = resolve_in(&pair(), "nosuchmethod").unwrap_err();
        assert!(matches!(err, CtlError::UnknownCommand(ref n) if n == "nosuchmethod"));
    }

    #[test]
    fn push_only_methods_are_unusable() {
        assert!(matches!(
            resolve_in(&pair(), "notifyblocks"),
            Err(CtlError::UnusableCommand(_))
        ));
        assert!(matches!(
            resolve_in(&pair(), "walletnote"),
            Err(CtlError::UnusableCommand(_))
        ));
    }

    #[test]
    fn builtin_registries_resolve() {
        assert_eq!(resolve("getinfo").unwrap().namespace(), Namespace::Chain);
        assert_eq!(resolve("getbalance").unwrap().namespace(), Namespace::Wallet);
        assert_eq!(
            resolve("getblock").unwrap().usage_text().unwrap(),
            r#"getblock "hash" (verbose=true verbosetx=false)"#
        );
    }
}
