//! OKEx v1 Authentication, Error Codes and Type Converters
//!
//! # Authentication
//!
//! 1. Add `api_key` to the call parameters
//! 2. Form-encode them with keys in ascending order
//! 3. MD5 `<encoded>&secret_key=<secret>`, upper-case hex
//! 4. Append it as the `sign` parameter
//!
//! # API Documentation
//!
//! - OKEx REST v1: <https://www.okex.com/rest_api.html>

use crate::rest::Params;
use crate::sign::{encode_params, md5_upper_hex};

pub const OKEX_REST_URL: &str = "https://www.okex.com";

/// Zero as OKEx formats it in `info.funds.free`.
pub const OKEX_ZERO_BALANCE: &str = "0";

#[derive(Clone)]
pub struct OkexAuth {
    pub api_key: String,
    pub api_secret: String,
}

impl OkexAuth {
    pub fn new(api_key: String, api_secret: String) -> Self {
        Self { api_key, api_secret }
    }

    /// Upper-case MD5 of the encoded parameters followed by the secret.
    pub fn sign(&self, encoded: &str) -> String {
        md5_upper_hex(&format!("{}&secret_key={}", encoded, self.api_secret))
    }

    /// Encoded, signed form: `...&sign=<digest>`.
    pub fn signed_form(&self, mut fields: Params) -> String {
        fields.insert("api_key".to_string(), self.api_key.clone());
        let encoded = encode_params(&fields);
        let sign = self.sign(&encoded);
        format!("{}&sign={}", encoded, sign)
    }
}

// ============================================================================
// Error Codes
// ============================================================================

/// Message for an OKEx v1 `error_code`.
pub fn error_message(code: i64) -> String {
    let known = match code {
        10000 => "Required field can not be null",
        10001 => "Request frequency too high",
        10002 => "System error",
        10003 => "Not in reqest list, please try again later",
        10004 => "IP not allowed to access the resource",
        10005 => "'secretKey' does not exist",
        10006 => "'Api_key' does not exist",
        10007 => "Signature does not match",
        10008 => "Illegal parameter",
        10009 => "Order does not exist",
        10010 => "Insufficient funds",
        10011 => "Amount too low",
        10012 => "Only btc_usd ltc_usd supported",
        10013 => "Only support https request",
        10014 => "Order price must be between 0 and 1,000,000",
        10015 => "Order price differs from current market price too much",
        10016 => "Insufficient coins balance",
        10017 => "API authorization error",
        10018 => "borrow amount less than lower limit",
        10019 => "loan agreement not checked",
        10020 => "rate cannot exceed 1%",
        10021 => "rate cannot less than 0.01%",
        10023 => "fail to get latest ticker",
        10024 => "balance not sufficient",
        10025 => "quota is full, cannot borrow temporarily",
        10026 => "Loan (including reserved loan) and margin cannot be withdrawn",
        10027 => "Cannot withdraw within 24 hrs of authentication information modification",
        10028 => "Withdrawal amount exceeds daily limit",
        10029 => "Account has unpaid loan, please cancel/pay off the loan before withdraw",
        10031 => "Deposits can only be withdrawn after 6 confirmations",
        10032 => "Please enabled phone/google authenticator",
        10033 => "Fee higher than maximum network transaction fee",
        10034 => "Fee lower than minimum network transaction fee",
        10035 => "Insufficient BTC/LTC",
        10036 => "Withdrawal amount too low",
        10037 => "Trade password not set",
        10040 => "Withdrawal cancellation fails",
        10041 => "Withdrawal address not exsit or approved",
        10042 => "Admin password error",
        10043 => "Account equity error, withdrawal failure",
        10044 => "fail to cancel borrowing order",
        10047 => "this function is disabled for sub-account",
        10048 => "withdrawal information does not exist",
        10049 => "User can not have more than 50 unfilled small orders (amount<0.15BTC)",
        10050 => "can't cancel more than once",
        10051 => "order completed transaction",
        10052 => "not allowed to withdraw",
        10064 => "after a USD deposit, that portion of assets will not be withdrawable for the next 48 hours",
        10100 => "User account frozen",
        10101 => "order type is wrong",
        10102 => "incorrect ID",
        10103 => "the private otc order's key incorrect",
        10216 => "Non-available API",
        1002 => "The transaction amount exceed the balance",
        1003 => "The transaction amount is less than the minimum",
        1004 => "The transaction amount is less than 0",
        1007 => "No trading market information",
        1008 => "No latest market information",
        1009 => "No order",
        1010 => "Different user of the cancelled order and the original order",
        1011 => "No documented user",
        1013 => "No order type",
        1014 => "No login",
        1015 => "No market depth information",
        1017 => "Date error",
        1018 => "Order failed",
        1019 => "Undo order failed",
        1024 => "Currency does not exist",
        1025 => "No chart type",
        1026 => "No base currency quantity",
        1027 => "Incorrect parameter may exceeded limits",
        1028 => "Reserved decimal failed",
        1029 => "Preparing",
        1030 => "Account has margin and futures, transactions can not be processed",
        _ => return format!("error code {}", code),
    };
    known.to_string()
}

// ============================================================================
// Type Converters
// ============================================================================

pub mod converters {
    use serde_json::Value;

    use crate::traits::{OrderState, Side};

    pub fn to_okex_side(side: Side) -> &'static str {
        side.as_str()
    }

    pub fn from_okex_side(side: &str) -> Side {
        match side {
            "sell" | "sell_market" => Side::Sell,
            _ => Side::Buy,
        }
    }

    /// Integer order status: 0 unfilled, 1 partially filled, 2 filled,
    /// -1 cancelled, 4 cancel in process.
    pub fn from_okex_status(status: &Value) -> OrderState {
        match status.as_i64() {
            Some(0) | Some(1) => OrderState::Alive,
            Some(-1) => OrderState::Cancelled,
            Some(other) => OrderState::Other(other.to_string()),
            None => OrderState::Other(crate::lenient::text(status)),
        }
    }
}
