//! Chain daemon method table.

use super::ParamKind::*;
use super::{MethodSpec, Namespace, StaticRegistry, def, method, notification, opt, req, ws_method};

pub static REGISTRY: StaticRegistry = StaticRegistry::new(Namespace::Chain, METHODS);

static METHODS: &[MethodSpec] = &[
    method("addnode", &[req("addr", Str), req("subcmd", Str)]),
    method("createrawssrtx", &[req("inputs", Array), opt("fee", Float)]),
    method(
        "createrawsstx",
        &[req("inputs", Array), req("amount", Object), req("couts", Array)],
    ),
    method(
        "createrawtransaction",
        &[
            req("inputs", Array),
            req("amounts", Object),
            opt("locktime", Int),
            opt("expiry", Int),
        ],
    ),
    method("debuglevel", &[req("levelspec", Str)]),
    method("decoderawtransaction", &[req("hextx", Str)]),
    method("decodescript", &[req("hexscript", Str), opt("version", Uint)]),
    method("estimatefee", &[req("numblocks", Int)]),
    method(
        "estimatesmartfee",
        &[req("confirmations", Int), def("mode", Str, "conservative")],
    ),
    method("estimatestakediff", &[opt("tickets", Uint)]),
    method("existsaddress", &[req("address", Str)]),
    method("existsaddresses", &[req("addresses", Array)]),
    method("existsexpiredtickets", &[req("txhashes", Array)]),
    method("existsliveticket", &[req("txhash", Str)]),
    method("existslivetickets", &[req("txhashes", Array)]),
    method("existsmempooltxs", &[req("txhashes", Array)]),
    method("existsmissedtickets", &[req("txhashes", Array)]),
    method("generate", &[req("numblocks", Uint)]),
    method("getaddednodeinfo", &[req("dns", Bool), opt("node", Str)]),
    method("getbestblock", &[]),
    method("getbestblockhash", &[]),
    method(
        "getblock",
        &[
            req("hash", Str),
            def("verbose", Bool, "true"),
            def("verbosetx", Bool, "false"),
        ],
    ),
    method("getblockchaininfo", &[]),
    method("getblockcount", &[]),
    method("getblockhash", &[req("index", Int)]),
    method("getblockheader", &[req("hash", Str), def("verbose", Bool, "true")]),
    method("getblocksubsidy", &[req("height", Int), req("voters", Uint)]),
    method("getcfilterv2", &[req("blockhash", Str)]),
    method("getchaintips", &[]),
    method("getcoinsupply", &[]),
    method("getconnectioncount", &[]),
    method("getcurrentnet", &[]),
    method("getdifficulty", &[]),
    method("getgenerate", &[]),
    method("gethashespersec", &[]),
    method("getheaders", &[req("blocklocators", Array), req("hashstop", Str)]),
    method("getinfo", &[]),
    method("getmempoolinfo", &[]),
    method("getmininginfo", &[]),
    method("getnettotals", &[]),
    method(
        "getnetworkhashps",
        &[def("blocks", Int, "120"), def("height", Int, "-1")],
    ),
    method("getnetworkinfo", &[]),
    method("getpeerinfo", &[]),
    method(
        "getrawmempool",
        &[def("verbose", Bool, "false"), opt("txtype", Str)],
    ),
    method("getrawtransaction", &[req("txid", Str), def("verbose", Int, "0")]),
    method("getstakedifficulty", &[]),
    method("getstakeversioninfo", &[opt("count", Int)]),
    method("getstakeversions", &[req("hash", Str), req("count", Int)]),
    method("getticketpoolvalue", &[]),
    method(
        "gettreasurybalance",
        &[opt("blockhash", Str), def("verbose", Bool, "false")],
    ),
    method(
        "gettxout",
        &[
            req("txid", Str),
            req("vout", Uint),
            req("tree", Int),
            def("includemempool", Bool, "true"),
        ],
    ),
    method("gettxoutsetinfo", &[]),
    method("getvoteinfo", &[req("version", Uint)]),
    method("getwork", &[opt("data", Str)]),
    method("help", &[opt("command", Str)]),
    method("invalidateblock", &[req("blockhash", Str)]),
    method("livetickets", &[]),
    method("missedtickets", &[]),
    method(
        "node",
        &[req("subcmd", Str), req("target", Str), opt("connectsubcmd", Str)],
    ),
    method("ping", &[]),
    method("reconsiderblock", &[req("blockhash", Str)]),
    method("regentemplate", &[]),
    method(
        "searchrawtransactions",
        &[
            req("address", Str),
            def("verbose", Int, "1"),
            def("skip", Int, "0"),
            def("count", Int, "100"),
            def("vinextra", Int, "0"),
            def("reverse", Bool, "false"),
            opt("filteraddrs", Array),
        ],
    ),
    method(
        "sendrawtransaction",
        &[req("hextx", Str), def("allowhighfees", Bool, "false")],
    ),
    method(
        "setgenerate",
        &[req("generate", Bool), def("genproclimit", Int, "-1")],
    ),
    method("stop", &[]),
    method("submitblock", &[req("hexblock", Str), opt("options", Object)]),
    method("ticketfeeinfo", &[opt("blocks", Uint), opt("windows", Uint)]),
    method("ticketsforaddress", &[req("address", Str)]),
    method("ticketvwap", &[opt("start", Uint), opt("end", Uint)]),
    method(
        "txfeeinfo",
        &[opt("blocks", Uint), opt("rangestart", Uint), opt("rangeend", Uint)],
    ),
    method("validateaddress", &[req("address", Str)]),
    method(
        "verifychain",
        &[def("checklevel", Int, "3"), def("checkdepth", Int, "288")],
    ),
    method(
        "verifymessage",
        &[req("address", Str), req("signature", Str), req("message", Str)],
    ),
    method("version", &[]),
    // websocket session only
    ws_method("authenticate", &[req("username", Str), req("passphrase", Str)]),
    ws_method(
        "loadtxfilter",
        &[req("reload", Bool), req("addresses", Array), req("outpoints", Array)],
    ),
    ws_method("notifyblocks", &[]),
    ws_method("notifynewtickets", &[]),
    ws_method(
        "notifynewtransactions",
        &[def("verbose", Bool, "false")],
    ),
    ws_method("notifytspend", &[]),
    ws_method("notifywinningtickets", &[]),
    ws_method("notifywork", &[]),
    ws_method("rebroadcastwinners", &[]),
    ws_method("rescan", &[req("blockhashes", Array)]),
    ws_method("session", &[]),
    ws_method("stopnotifyblocks", &[]),
    ws_method("stopnotifynewtransactions", &[]),
    // notifications
    notification("blockconnected", &[req("header", Str), req("subscribedtxs", Array)]),
    notification("blockdisconnected", &[req("header", Str)]),
    notification(
        "newtickets",
        &[
            req("hash", Str),
            req("height", Int),
            req("stakediff", Int),
            req("tickets", Array),
        ],
    ),
    notification(
        "reorganization",
        &[
            req("oldhash", Str),
            req("oldheight", Int),
            req("newhash", Str),
            req("newheight", Int),
        ],
    ),
    notification("relevanttxaccepted", &[req("transaction", Str)]),
    notification("tspend", &[req("tspend", Str)]),
    notification("txaccepted", &[req("txid", Str), req("amount", Float)]),
    notification("txacceptedverbose", &[req("rawtx", Object)]),
    notification(
        "winningtickets",
        &[req("blockhash", Str), req("blockheight", Int), req("tickets", Array)],
    ),
    notification(
        "work",
        &[req("data", Str), req("target", Str), req("reason", Str)],
    ),
];
