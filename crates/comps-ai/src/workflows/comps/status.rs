use super::domain::CanonicalStatus;

/// Provider short codes and keywords per canonical bucket. Matching order is
/// load-bearing: leasing and contract checks run before the plain "active"
/// keyword so "For Lease" and "Active Under Contract" land in the right
/// bucket, and a stale current status defers to a just-closed last status.
const LEASING_CODES: &[&str] = &["lsd", "lse"];
const LEASING_KEYWORDS: &[&str] = &["leasing", "for rent", "rental", "lease"];
const CLOSED_CODES: &[&str] = &["sld", "cld"];
const CLOSED_KEYWORDS: &[&str] = &["closed", "sold"];
const PENDING_CODES: &[&str] = &["pnd", "uc"];
const PENDING_KEYWORDS: &[&str] = &["pending", "under contract"];
const ACTIVE_CODES: &[&str] = &["a", "act", "new"];
const BACK_ON_MARKET_CODES: &[&str] = &["bom"];
const WITHDRAWN_CODES: &[&str] = &["wth", "ter"];
const WITHDRAWN_KEYWORDS: &[&str] = &["withdrawn", "terminated"];
const EXPIRED_CODES: &[&str] = &["exp"];

/// Map a raw provider status (and the optional secondary "last status") onto
/// the canonical enum. Total over arbitrary input; anything unrecognized is
/// `Unknown`, never an error.
pub fn normalize_status(raw_status: Option<&str>, raw_last_status: Option<&str>) -> CanonicalStatus {
    let status = normalize_input(raw_status);
    let last = normalize_input(raw_last_status);
    let status = status.as_deref();
    let last = last.as_deref();

    // A "Leased" or "Sold" last status outranks whatever the current status
    // still says; providers lag on closing out transactions.
    if matches_bucket(status, LEASING_CODES, LEASING_KEYWORDS)
        || matches_bucket(last, LEASING_CODES, LEASING_KEYWORDS)
    {
        return CanonicalStatus::Leasing;
    }

    if matches_bucket(status, CLOSED_CODES, CLOSED_KEYWORDS)
        || matches_bucket(last, CLOSED_CODES, CLOSED_KEYWORDS)
    {
        return CanonicalStatus::Closed;
    }

    if matches_bucket(status, PENDING_CODES, PENDING_KEYWORDS) {
        return CanonicalStatus::Pending;
    }

    if matches_code(status, ACTIVE_CODES) || contains_keyword(status, &["active"]) {
        return CanonicalStatus::Active;
    }

    if matches_code(status, BACK_ON_MARKET_CODES) || contains_keyword(status, &["back on market"]) {
        return CanonicalStatus::Active;
    }

    if matches_bucket(status, WITHDRAWN_CODES, WITHDRAWN_KEYWORDS) {
        return CanonicalStatus::Withdrawn;
    }

    if matches_code(status, EXPIRED_CODES) || contains_keyword(status, &["expired"]) {
        return CanonicalStatus::Expired;
    }

    CanonicalStatus::Unknown
}

fn normalize_input(raw: Option<&str>) -> Option<String> {
    raw.map(|value| value.trim().to_ascii_lowercase())
        .filter(|value| !value.is_empty())
}

fn matches_bucket(value: Option<&str>, codes: &[&str], keywords: &[&str]) -> bool {
    matches_code(value, codes) || contains_keyword(value, keywords)
}

fn matches_code(value: Option<&str>, codes: &[&str]) -> bool {
    value.is_some_and(|status| codes.contains(&status))
}

fn contains_keyword(value: Option<&str>, keywords: &[&str]) -> bool {
    value.is_some_and(|status| keywords.iter().any(|keyword| status.contains(keyword)))
}
