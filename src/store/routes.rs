//! Query routes of each chain module

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde_json::Value;

use crate::codec::MessageDescriptor;
use crate::proto::{intergamm, qbank, qoracle};

/// Bytes escaped in a path parameter; RFC 3986 unreserved characters pass
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// One REST query exposed by a module
#[derive(Debug)]
pub struct QueryRoute {
    /// Route name; the action that runs it is `Query<name>`
    pub name: &'static str,
    /// Path template with `{param}` placeholders
    pub path: &'static str,
    /// Accepts `pagination.*` query parameters and may return several pages
    pub paginated: bool,
    /// Response message type, when the schema declares one
    pub response: Option<&'static MessageDescriptor>,
}

impl QueryRoute {
    const fn new(name: &'static str, path: &'static str) -> Self {
        Self {
            name,
            path,
            paginated: false,
            response: None,
        }
    }

    const fn paginated(self) -> Self {
        Self {
            paginated: true,
            ..self
        }
    }

    const fn returns(self, desc: &'static MessageDescriptor) -> Self {
        Self {
            response: Some(desc),
            ..self
        }
    }

    /// Action label, e.g. `QueryDepositAll`
    pub fn action(&self) -> String {
        format!("Query{}", self.name)
    }

    /// Substitute `{param}` placeholders from the params object
    ///
    /// Each value is percent-encoded as a single path segment, so a denom
    /// like `ibc/27394F...` stays one segment.
    pub fn render_path(&self, params: &Value) -> Result<String, String> {
        let mut out = String::with_capacity(self.path.len());
        let mut rest = self.path;
        while let Some(start) = rest.find('{') {
            out.push_str(&rest[..start]);
            let after = &rest[start + 1..];
            let end = after
                .find('}')
                .ok_or_else(|| format!("unterminated placeholder in {}", self.path))?;
            let name = &after[..end];
            let value = match params.get(name) {
                Some(Value::String(s)) => s.clone(),
                Some(Value::Number(n)) => n.to_string(),
                Some(Value::Bool(b)) => b.to_string(),
                _ => return Err(format!("missing path parameter {name}")),
            };
            out.extend(utf8_percent_encode(&value, PATH_SEGMENT));
            rest = &after[end + 1..];
        }
        out.push_str(rest);
        Ok(out)
    }
}

/// Flatten a query object into `a.b=c` pairs
///
/// Nested objects produce dotted keys, so `{"pagination": {"limit": 10}}`
/// and `{"pagination.limit": 10}` send the same parameter. Nulls are dropped.
pub fn query_pairs(query: &Value) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    flatten("", query, &mut pairs);
    pairs
}

fn flatten(prefix: &str, value: &Value, out: &mut Vec<(String, String)>) {
    match value {
        Value::Null => {}
        Value::Object(map) => {
            for (key, inner) in map {
                let name = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };
                flatten(&name, inner, out);
            }
        }
        Value::Array(items) => {
            for item in items {
                flatten(prefix, item, out);
            }
        }
        Value::String(s) => out.push((prefix.to_string(), s.clone())),
        other => out.push((prefix.to_string(), other.to_string())),
    }
}

/// A chain module served by one store
#[derive(Debug)]
pub struct ModuleSpec {
    /// Module path, e.g. `abag.quasarnode.qbank`
    pub name: &'static str,
    pub routes: &'static [QueryRoute],
    /// Transaction messages the module accepts
    pub msgs: &'static [&'static MessageDescriptor],
    /// State types whose structure is exposed
    pub types: &'static [&'static MessageDescriptor],
}

impl ModuleSpec {
    pub fn route(&self, name: &str) -> Option<&'static QueryRoute> {
        self.routes.iter().find(|route| route.name == name)
    }

    /// Route run by an action label such as `QueryParams`
    pub fn route_for_action(&self, action: &str) -> Option<&'static QueryRoute> {
        action.strip_prefix("Query").and_then(|name| self.route(name))
    }
}

pub static QBANK: ModuleSpec = ModuleSpec {
    name: "abag.quasarnode.qbank",
    routes: &[
        QueryRoute::new("Params", "/abag/quasarnode/qbank/params").returns(&qbank::QUERY_PARAMS_RESPONSE),
        QueryRoute::new("Deposit", "/abag/quasarnode/qbank/deposit/{id}")
            .returns(&qbank::QUERY_GET_DEPOSIT_RESPONSE),
        QueryRoute::new("DepositAll", "/abag/quasarnode/qbank/deposit")
            .paginated()
            .returns(&qbank::QUERY_ALL_DEPOSIT_RESPONSE),
        QueryRoute::new("UserDenomDeposit", "/abag/quasarnode/qbank/user_denom_deposit/{userAcc}")
            .returns(&qbank::QUERY_USER_DENOM_DEPOSIT_RESPONSE),
        QueryRoute::new("FeeData", "/abag/quasarnode/qbank/fee_data"),
        QueryRoute::new("UserClaimRewards", "/abag/quasarnode/qbank/user_claim_rewards/{userAcc}"),
        QueryRoute::new(
            "UserDenomEpochLockupDeposit",
            "/abag/quasarnode/qbank/user_denom_epoch_lockup_deposit/{userAcc}/{denom}/{epochDay}/{lockupType}",
        ),
        QueryRoute::new(
            "UserDenomLockupDeposit",
            "/abag/quasarnode/qbank/user_denom_lockup_deposit/{userAcc}/{denom}/{lockupType}",
        ),
        QueryRoute::new("UserDenomWithdraw", "/abag/quasarnode/qbank/user_denom_withdraw/{userAcc}/{denom}"),
        QueryRoute::new("UserDeposit", "/abag/quasarnode/qbank/user_deposit/{userAcc}"),
        QueryRoute::new("UserWithdraw", "/abag/quasarnode/qbank/user_withdraw/{userAcc}"),
        QueryRoute::new("Withdrable", "/abag/quasarnode/qbank/withdrable/{userAccount}/{denom}"),
        QueryRoute::new("Withdraw", "/abag/quasarnode/qbank/withdraw/{id}"),
        QueryRoute::new("WithdrawAll", "/abag/quasarnode/qbank/withdraw").paginated(),
    ],
    msgs: &qbank::MSGS,
    types: &qbank::TYPES,
};

pub static QORACLE: ModuleSpec = ModuleSpec {
    name: "abag.quasarnode.qoracle",
    routes: &[
        QueryRoute::new("Params", "/abag/quasarnode/qoracle/params"),
        QueryRoute::new("PoolPosition", "/abag/quasarnode/qoracle/pool_position/{poolId}"),
        QueryRoute::new("PoolPositionAll", "/abag/quasarnode/qoracle/pool_position").paginated(),
        QueryRoute::new("PoolRanking", "/abag/quasarnode/qoracle/pool_ranking"),
        QueryRoute::new(
            "PoolSpotPrice",
            "/abag/quasarnode/qoracle/pool_spot_price/{poolId}/{denomIn}/{denomOut}",
        ),
        QueryRoute::new("PoolSpotPriceAll", "/abag/quasarnode/qoracle/pool_spot_price").paginated(),
        QueryRoute::new("PoolInfo", "/abag/quasarnode/qoracle/pool_info/{poolId}"),
        QueryRoute::new("PoolInfoAll", "/abag/quasarnode/qoracle/pool_info").paginated(),
    ],
    msgs: &qoracle::MSGS,
    types: &qoracle::TYPES,
};

pub static INTERGAMM: ModuleSpec = ModuleSpec {
    name: "abag.quasarnode.intergamm",
    routes: &[
        QueryRoute::new("Params", "/abag/quasarnode/intergamm/params"),
        QueryRoute::new(
            "InterchainAccountFromAddress",
            "/abag/quasarnode/intergamm/interchain_account_from_address",
        )
        .returns(&intergamm::QUERY_INTERCHAIN_ACCOUNT_FROM_ADDRESS_RESPONSE),
    ],
    msgs: &intergamm::MSGS,
    types: &intergamm::TYPES,
};

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_render_path() {
        let route = QBANK.route("UserDenomLockupDeposit").unwrap();
        let path = route
            .render_path(&json!({ "userAcc": "quasar1u", "denom": "uatom", "lockupType": 2 }))
            .unwrap();
        assert_eq!(
            path,
            "/abag/quasarnode/qbank/user_denom_lockup_deposit/quasar1u/uatom/2"
        );
        assert!(route.render_path(&json!({ "userAcc": "x" })).is_err());
        assert_eq!(
            QBANK.route("Params").unwrap().render_path(&Value::Null).unwrap(),
            "/abag/quasarnode/qbank/params"
        );
    }

    #[test]
    fn test_render_path_escapes_segments() {
        let route = QBANK.route("UserDenomWithdraw").unwrap();
        let path = route
            .render_path(&json!({ "userAcc": "quasar1u", "denom": "ibc/27394F AB" }))
            .unwrap();
        assert_eq!(
            path,
            "/abag/quasarnode/qbank/user_denom_withdraw/quasar1u/ibc%2F27394F%20AB"
        );
    }

    #[test]
    fn test_query_pairs_flatten() {
        let pairs = query_pairs(&json!({
            "pagination": { "limit": 10, "count_total": true },
            "denom": "uqsr",
            "skip": null
        }));
        assert!(pairs.contains(&("pagination.limit".to_string(), "10".to_string())));
        assert!(pairs.contains(&("pagination.count_total".to_string(), "true".to_string())));
        assert!(pairs.contains(&("denom".to_string(), "uqsr".to_string())));
        assert_eq!(pairs.len(), 3);
        assert!(query_pairs(&Value::Null).is_empty());
    }

    #[test]
    fn test_route_for_action() {
        assert_eq!(QORACLE.route_for_action("QueryPoolInfoAll").map(|r| r.paginated), Some(true));
        assert!(QORACLE.route_for_action("PoolInfoAll").is_none());
        assert_eq!(QBANK.route("DepositAll").unwrap().action(), "QueryDepositAll");
    }
}
