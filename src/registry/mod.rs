/*!
Method registries for the two daemons sharing the command namespace.

Each registry is a static table of `MethodSpec`s exposed through the
`MethodRegistry` capability trait:
  - method_names   : enumerate registered methods (table order)
  - usage_flags    : calling restrictions bitset
  - usage_text     : one-line usage (`getblock "hash" (verbose=true verbosetx=false)`)
  - construct      : coerce raw string arguments into a typed `Command`

Two instances exist (`chain::REGISTRY`, `wallet::REGISTRY`); callers try them
in a fixed priority order rather than through any inheritance.
*/

pub mod chain;
pub mod wallet;

use std::fmt;
use std::num::IntErrorKind;

use bitflags::bitflags;
use serde_json::Value;

use crate::error::{ArgErrorCode, CtlError};

bitflags! {
    /// Per-method calling restrictions.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct UsageFlags: u32 {
        /// Only served by the wallet daemon.
        const WALLET_ONLY = 1;
        /// Only valid over a persistent websocket session.
        const WEBSOCKET_ONLY = 2;
        /// Server-initiated notification, never a request.
        const NOTIFICATION = 4;
    }
}

/// Flags marking methods this client cannot issue (no push channel, no subscriptions).
pub const UNUSABLE_FLAGS: UsageFlags = UsageFlags::WEBSOCKET_ONLY.union(UsageFlags::NOTIFICATION);

/// Which daemon a registry describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    Chain,
    Wallet,
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Namespace::Chain => f.write_str("chain"),
            Namespace::Wallet => f.write_str("wallet"),
        }
    }
}

/* ---- Static method tables ---- */

/// Declared JSON type of a positional parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    Str,
    Int,
    Uint,
    Float,
    Bool,
    /// JSON object literal
    Object,
    /// JSON array literal
    Array,
}

#[derive(Debug, Clone, Copy)]
pub struct ParamSpec {
    pub name: &'static str,
    pub kind: ParamKind,
    pub required: bool,
    pub default: Option<&'static str>,
}

#[derive(Debug, Clone, Copy)]
pub struct MethodSpec {
    pub name: &'static str,
    pub flags: UsageFlags,
    pub params: &'static [ParamSpec],
}

pub const fn req(name: &'static str, kind: ParamKind) -> ParamSpec {
    ParamSpec {
        name,
        kind,
        required: true,
        default: None,
    }
}

pub const fn opt(name: &'static str, kind: ParamKind) -> ParamSpec {
    ParamSpec {
        name,
        kind,
        required: false,
        default: None,
    }
}

pub const fn def(name: &'static str, kind: ParamKind, default: &'static str) -> ParamSpec {
    ParamSpec {
        name,
        kind,
        required: false,
        default: Some(default),
    }
}

pub const fn method(name: &'static str, params: &'static [ParamSpec]) -> MethodSpec {
    MethodSpec {
        name,
        flags: UsageFlags::empty(),
        params,
    }
}

pub const fn ws_method(name: &'static str, params: &'static [ParamSpec]) -> MethodSpec {
    MethodSpec {
        name,
        flags: UsageFlags::WEBSOCKET_ONLY,
        params,
    }
}

pub const fn notification(name: &'static str, params: &'static [ParamSpec]) -> MethodSpec {
    MethodSpec {
        name,
        flags: UsageFlags::WEBSOCKET_ONLY.union(UsageFlags::NOTIFICATION),
        params,
    }
}

/* ---- Typed command ---- */

/// A method call with fully coerced positional parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    pub method: &'static str,
    pub params: Vec<Value>,
}

/* ---- Capability trait ---- */

pub trait MethodRegistry: Sync {
    fn namespace(&self) -> Namespace;

    fn method_names(&self) -> Vec<&'static str>;

    fn usage_flags(&self, method: &str) -> Option<UsageFlags>;

    fn usage_text(&self, method: &str) -> Option<String>;

    /// Build a typed command from raw arguments, checking arity and shape.
    fn construct(&self, method: &str, args: &[String]) -> Result<Command, CtlError>;
}

/// Registry backed by a `&'static [MethodSpec]` table.
pub struct StaticRegistry {
    namespace: Namespace,
    methods: &'static [MethodSpec],
}

impl StaticRegistry {
    pub const fn new(namespace: Namespace, methods: &'static [MethodSpec]) -> Self {
        Self { namespace, methods }
    }

    fn find(&self, method: &str) -> Option<&'static MethodSpec> {
        self.methods.iter().find(|m| m.name == method)
    }
}

impl MethodRegistry for StaticRegistry {
    fn namespace(&self) -> Namespace {
        self.namespace
    }

    fn method_names(&self) -> Vec<&'static str> {
        self.methods.iter().map(|m| m.name).collect()
    }

    fn usage_flags(&self, method: &str) -> Option<UsageFlags> {
        let scope = match self.namespace {
            Namespace::Wallet => UsageFlags::WALLET_ONLY,
            Namespace::Chain => UsageFlags::empty(),
        };
        self.find(method).map(|m| m.flags | scope)
    }

    fn usage_text(&self, method: &str) -> Option<String> {
        self.find(method).map(usage_line)
    }

    fn construct(&self, method: &str, args: &[String]) -> Result<Command, CtlError> {
        let spec = self
            .find(method)
            .ok_or_else(|| CtlError::UnknownCommand(method.to_string()))?;
        construct_command(spec, args)
    }
}

/* ---- Construction / coercion ---- */

fn invalid(method: &str, code: ArgErrorCode, message: String) -> CtlError {
    CtlError::InvalidArguments {
        method: method.to_string(),
        code,
        message,
    }
}

fn construct_command(spec: &'static MethodSpec, args: &[String]) -> Result<Command, CtlError> {
    let required = spec.params.iter().filter(|p| p.required).count();
    let max = spec.params.len();
    if args.len() < required || args.len() > max {
        let expected = if required == max {
            format!("{max}")
        } else {
            format!("{required} to {max}")
        };
        return Err(invalid(
            spec.name,
            ArgErrorCode::NumParams,
            format!(
                "wrong number of params (expected {expected}, received {})",
                args.len()
            ),
        ));
    }

    let mut params = Vec::with_capacity(args.len());
    for (idx, (param, raw)) in spec.params.iter().zip(args).enumerate() {
        let value = coerce(param.kind, raw).map_err(|(code, why)| {
            invalid(
                spec.name,
                code,
                format!("parameter #{} '{}' {why}", idx + 1, param.name),
            )
        })?;
        params.push(value);
    }

    Ok(Command {
        method: spec.name,
        params,
    })
}

/// Coerce one raw argument into a JSON value of the declared kind.
pub fn coerce(kind: ParamKind, raw: &str) -> Result<Value, (ArgErrorCode, String)> {
    match kind {
        ParamKind::Str => Ok(Value::String(raw.to_string())),
        ParamKind::Int => raw.parse::<i64>().map(Value::from).map_err(|e| {
            match e.kind() {
                IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => (
                    ArgErrorCode::InvalidValue,
                    format!("value {raw:?} is out of range for a 64-bit integer"),
                ),
                _ => (
                    ArgErrorCode::InvalidType,
                    format!("must be an integer, got {raw:?}"),
                ),
            }
        }),
        ParamKind::Uint => {
            if let Some(rest) = raw.strip_prefix('-')
                && rest.parse::<u64>().is_ok()
            {
                return Err((
                    ArgErrorCode::InvalidValue,
                    format!("must be unsigned, got {raw:?}"),
                ));
            }
            raw.parse::<u64>().map(Value::from).map_err(|e| match e.kind() {
                IntErrorKind::PosOverflow => (
                    ArgErrorCode::InvalidValue,
                    format!("value {raw:?} is out of range for a 64-bit unsigned integer"),
                ),
                _ => (
                    ArgErrorCode::InvalidType,
                    format!("must be an unsigned integer, got {raw:?}"),
                ),
            })
        }
        ParamKind::Float => {
            let f = raw.parse::<f64>().map_err(|_| {
                (
                    ArgErrorCode::InvalidType,
                    format!("must be a number, got {raw:?}"),
                )
            })?;
            serde_json::Number::from_f64(f)
                .map(Value::Number)
                .ok_or_else(|| {
                    (
                        ArgErrorCode::InvalidValue,
                        format!("must be a finite number, got {raw:?}"),
                    )
                })
        }
        ParamKind::Bool => match raw {
            "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(Value::Bool(true)),
            "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(Value::Bool(false)),
            _ => Err((
                ArgErrorCode::InvalidType,
                format!("must be a bool, got {raw:?}"),
            )),
        },
        ParamKind::Object | ParamKind::Array => {
            let v: Value = serde_json::from_str(raw).map_err(|e| {
                (
                    ArgErrorCode::InvalidType,
                    format!("must be valid JSON ({e})"),
                )
            })?;
            let shape_ok = match kind {
                ParamKind::Object => v.is_object(),
                _ => v.is_array(),
            };
            if shape_ok {
                Ok(v)
            } else {
                let want = if kind == ParamKind::Object {
                    "a JSON object"
                } else {
                    "a JSON array"
                };
                Err((ArgErrorCode::InvalidType, format!("must be {want}")))
            }
        }
    }
}

/* ---- Usage text ---- */

fn param_token(p: &ParamSpec) -> String {
    match p.kind {
        ParamKind::Str => format!("\"{}\"", p.name),
        ParamKind::Object => format!("{{{}}}", p.name),
        ParamKind::Array => format!("[{},...]", p.name),
        ParamKind::Int | ParamKind::Uint | ParamKind::Float | ParamKind::Bool => {
            p.name.to_string()
        }
    }
}

fn usage_line(spec: &MethodSpec) -> String {
    let mut line = String::from(spec.name);
    for p in spec.params.iter().filter(|p| p.required) {
        line.push(' ');
        line.push_str(&param_token(p));
    }

    let optional: Vec<String> = spec
        .params
        .iter()
        .filter(|p| !p.required)
        .map(|p| match p.default {
            Some(d) if p.kind == ParamKind::Str => format!("{}=\"{d}\"", p.name),
            Some(d) => format!("{}={d}", p.name),
            None => param_token(p),
        })
        .collect();
    if !optional.is_empty() {
        line.push_str(" (");
        line.push_str(&optional.join(" "));
        line.push(')');
    }
    line
}
