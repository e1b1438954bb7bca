//! Wallet daemon method table.
//!
//! Several names (`getinfo`, `help`, `validateaddress`, ...) also exist in the
//! chain table; resolution reaches these entries only for wallet-only names.

use super::ParamKind::*;
use super::{MethodSpec, Namespace, StaticRegistry, def, method, opt, req};

pub static REGISTRY: StaticRegistry = StaticRegistry::new(Namespace::Wallet, METHODS);

static METHODS: &[MethodSpec] = &[
    method("abandontransaction", &[req("hash", Str)]),
    method("accountaddressindex", &[req("account", Str), req("branch", Int)]),
    method(
        "accountsyncaddressindex",
        &[req("account", Str), req("branch", Uint), req("index", Int)],
    ),
    method(
        "addmultisigaddress",
        &[req("nrequired", Int), req("keys", Array), opt("account", Str)],
    ),
    method("addtransaction", &[req("blockhash", Str), req("transaction", Str)]),
    method("auditreuse", &[opt("since", Int)]),
    method(
        "consolidate",
        &[req("inputs", Int), opt("account", Str), opt("address", Str)],
    ),
    method("createmultisig", &[req("nrequired", Int), req("keys", Array)]),
    method("createnewaccount", &[req("account", Str)]),
    method(
        "createsignature",
        &[
            req("address", Str),
            req("inputindex", Int),
            req("hashtype", Int),
            req("previouspkscript", Str),
            req("serializedtransaction", Str),
        ],
    ),
    method(
        "discoverusage",
        &[opt("startblock", Str), opt("discoveraccounts", Bool), opt("gaplimit", Uint)],
    ),
    method("dumpprivkey", &[req("address", Str)]),
    method(
        "fundrawtransaction",
        &[req("hexstring", Str), req("fundaccount", Str), opt("options", Object)],
    ),
    method(
        "generatevote",
        &[
            req("blockhash", Str),
            req("height", Int),
            req("tickethash", Str),
            req("votebits", Uint),
            req("votebitsext", Str),
        ],
    ),
    method("getaccount", &[req("address", Str)]),
    method("getaccountaddress", &[req("account", Str)]),
    method("getaddressesbyaccount", &[req("account", Str)]),
    method("getbalance", &[opt("account", Str), def("minconf", Int, "1")]),
    method("getcoinjoinsbyacct", &[]),
    method("getinfo", &[]),
    method("getmasterpubkey", &[opt("account", Str)]),
    method("getmultisigoutinfo", &[req("hash", Str), req("index", Uint)]),
    method("getnewaddress", &[opt("account", Str), opt("gappolicy", Str)]),
    method("getrawchangeaddress", &[opt("account", Str)]),
    method("getreceivedbyaccount", &[req("account", Str), def("minconf", Int, "1")]),
    method("getreceivedbyaddress", &[req("address", Str), def("minconf", Int, "1")]),
    method("getstakeinfo", &[]),
    method("gettickets", &[req("includeimmature", Bool)]),
    method(
        "gettransaction",
        &[req("txid", Str), def("includewatchonly", Bool, "false")],
    ),
    method("getunconfirmedbalance", &[opt("account", Str)]),
    method("getvotechoices", &[opt("tickethash", Str)]),
    method("getwalletfee", &[]),
    method("help", &[opt("command", Str)]),
    method(
        "importprivkey",
        &[
            req("privkey", Str),
            opt("label", Str),
            def("rescan", Bool, "true"),
            opt("scanfrom", Int),
        ],
    ),
    method(
        "importscript",
        &[req("hex", Str), def("rescan", Bool, "true"), opt("scanfrom", Int)],
    ),
    method("importxpub", &[req("name", Str), req("xpub", Str)]),
    method("listaccounts", &[def("minconf", Int, "1")]),
    method(
        "listaddresstransactions",
        &[req("addresses", Array), opt("account", Str)],
    ),
    method("listalltransactions", &[opt("account", Str)]),
    method("listlockunspent", &[opt("account", Str)]),
    method(
        "listreceivedbyaccount",
        &[
            def("minconf", Int, "1"),
            def("includeempty", Bool, "false"),
            def("includewatchonly", Bool, "false"),
        ],
    ),
    method(
        "listreceivedbyaddress",
        &[
            def("minconf", Int, "1"),
            def("includeempty", Bool, "false"),
            def("includewatchonly", Bool, "false"),
        ],
    ),
    method(
        "listsinceblock",
        &[
            opt("blockhash", Str),
            def("targetconfirmations", Int, "1"),
            def("includewatchonly", Bool, "false"),
        ],
    ),
    method(
        "listtransactions",
        &[
            opt("account", Str),
            def("count", Int, "10"),
            def("from", Int, "0"),
            def("includewatchonly", Bool, "false"),
        ],
    ),
    method(
        "listunspent",
        &[
            def("minconf", Int, "1"),
            def("maxconf", Int, "9999999"),
            opt("addresses", Array),
            opt("account", Str),
        ],
    ),
    method("lockunspent", &[req("unlock", Bool), req("transactions", Array)]),
    method("mixaccount", &[]),
    method("mixoutput", &[req("outpoint", Str)]),
    method(
        "purchaseticket",
        &[
            req("fromaccount", Str),
            req("spendlimit", Float),
            def("minconf", Int, "1"),
            opt("ticketaddress", Str),
            opt("numtickets", Int),
            opt("pooladdress", Str),
            opt("poolfees", Float),
            opt("expiry", Int),
            opt("comment", Str),
            opt("dontsigntx", Bool),
        ],
    ),
    method(
        "redeemmultisigout",
        &[req("hash", Str), req("index", Uint), req("tree", Int), opt("address", Str)],
    ),
    method(
        "redeemmultisigouts",
        &[req("fromscraddress", Str), opt("toaddress", Str), opt("number", Int)],
    ),
    method("renameaccount", &[req("oldaccount", Str), req("newaccount", Str)]),
    method("rescanwallet", &[def("beginheight", Int, "0")]),
    method("revoketickets", &[]),
    method(
        "sendfrom",
        &[
            req("fromaccount", Str),
            req("toaddress", Str),
            req("amount", Float),
            def("minconf", Int, "1"),
            opt("comment", Str),
            opt("commentto", Str),
        ],
    ),
    method(
        "sendmany",
        &[
            req("fromaccount", Str),
            req("amounts", Object),
            def("minconf", Int, "1"),
            opt("comment", Str),
        ],
    ),
    method(
        "sendtoaddress",
        &[
            req("address", Str),
            req("amount", Float),
            opt("comment", Str),
            opt("commentto", Str),
        ],
    ),
    method(
        "sendtomultisig",
        &[
            req("fromaccount", Str),
            req("amount", Float),
            req("pubkeys", Array),
            def("nrequired", Int, "1"),
            def("minconf", Int, "1"),
            opt("comment", Str),
        ],
    ),
    method("setticketfee", &[req("fee", Float)]),
    method("settxfee", &[req("amount", Float)]),
    method(
        "setvotechoice",
        &[req("agendaid", Str), req("choiceid", Str), opt("tickethash", Str)],
    ),
    method("signmessage", &[req("address", Str), req("message", Str)]),
    method(
        "signrawtransaction",
        &[
            req("rawtx", Str),
            opt("inputs", Array),
            opt("privkeys", Array),
            def("flags", Str, "ALL"),
        ],
    ),
    method(
        "signrawtransactions",
        &[req("rawtxs", Array), def("send", Bool, "true")],
    ),
    method("stakepooluserinfo", &[req("user", Str)]),
    method(
        "sweepaccount",
        &[
            req("sourceaccount", Str),
            req("destinationaddress", Str),
            opt("requiredconfirmations", Uint),
            opt("feeperkb", Float),
        ],
    ),
    method("ticketsforaddress", &[req("address", Str)]),
    method("validateaddress", &[req("address", Str)]),
    method(
        "verifymessage",
        &[req("address", Str), req("signature", Str), req("message", Str)],
    ),
    method("version", &[]),
    method("walletinfo", &[]),
    method("walletislocked", &[]),
    method("walletlock", &[]),
    method("walletpassphrase", &[req("passphrase", Str), req("timeout", Int)]),
    method(
        "walletpassphrasechange",
        &[req("oldpassphrase", Str), req("newpassphrase", Str)],
    ),
    method(
        "walletpubpassphrasechange",
        &[req("oldpassphrase", Str), req("newpassphrase", Str)],
    ),
];
