//! Bank balances and Osmosis lockups

use anyhow::{Context, Result};
use serde_json::Value;

use crate::chain::client::QueryClient;
use crate::chain::tx::Coin;

/// Spendable balances of an account
pub async fn balances(client: &dyn QueryClient, address: &str) -> Result<Vec<Coin>> {
    let path = format!("/cosmos/bank/v1beta1/balances/{address}");
    let body = client.get(&path, &[]).await?;
    coins_at(&body, "balances")
}

/// Coins an Osmosis account holds in lockups
pub async fn locked_coins(client: &dyn QueryClient, address: &str) -> Result<Vec<Coin>> {
    let path = format!("/osmosis/lockup/v1beta1/account_locked_coins/{address}");
    let body = client.get(&path, &[]).await?;
    coins_at(&body, "coins")
}

fn coins_at(body: &Value, key: &str) -> Result<Vec<Coin>> {
    let coins = body
        .get(key)
        .cloned()
        .with_context(|| format!("response has no {key}"))?;
    serde_json::from_value(coins).with_context(|| format!("malformed {key}"))
}

/// `amount` immediately followed by `denom`, comma separated
pub fn format_coins(coins: &[Coin]) -> String {
    coins
        .iter()
        .map(|coin| format!("{}{}", coin.amount, coin.denom))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_coins_at_and_format() {
        let body = json!({ "balances": [
            { "denom": "uqsr", "amount": "10" },
            { "denom": "uosmo", "amount": "7" }
        ], "pagination": null });
        let coins = coins_at(&body, "balances").unwrap();
        assert_eq!(format_coins(&coins), "10uqsr, 7uosmo");
        assert_eq!(format_coins(&[]), "");
        assert!(coins_at(&body, "coins").is_err());
    }
}
