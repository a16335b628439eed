//! Plain-text rendering of server records.

use backlink_vista_core::{
    Cart, Facets, FundsOffer, Listing, Order, OrderSummary, TransactionKind, UserProfile, Wallet,
};

/// Print a rendered block to stdout.
#[allow(clippy::print_stdout)]
pub fn emit(text: &str) {
    println!("{}", text.trim_end());
}

fn or_dash(value: Option<&str>) -> &str {
    value.filter(|v| !v.trim().is_empty()).unwrap_or("-")
}

#[must_use]
pub fn profile(user: &UserProfile) -> String {
    [
        format!("{} <{}>", user.display_name(), user.email),
        format!("  id:       {}", user.id),
        format!("  phone:    {}", or_dash(user.phone.as_deref())),
        format!("  company:  {}", or_dash(user.company.as_deref())),
        format!("  country:  {}", or_dash(user.country.as_deref())),
        format!("  address:  {}", or_dash(user.address.as_deref())),
        format!("  joined:   {}", user.created_at.format("%Y-%m-%d")),
    ]
    .join("\n")
}

#[must_use]
pub fn listings(listings: &[Listing]) -> String {
    if listings.is_empty() {
        return "No websites match these filters.".to_string();
    }

    let mut lines = vec![format!(
        "{:>4}  {:<28} {:>3}  {:<10} {:<14} {:<16} {:>10}",
        "ID", "URL", "DR", "LANGUAGE", "COUNTRY", "CATEGORY", "PRICE"
    )];
    lines.extend(listings.iter().map(|l| {
        format!(
            "{:>4}  {:<28} {:>3}  {:<10} {:<14} {:<16} {:>10}",
            l.id,
            l.url,
            l.metrics.domain_rating,
            l.metrics.language,
            l.metrics.traffic_by_country,
            or_dash(l.category.as_deref()),
            l.price.to_string(),
        )
    }));
    lines.push(format!("{} website(s)", listings.len()));
    lines.join("\n")
}

#[must_use]
pub fn listing(l: &Listing) -> String {
    let m = &l.metrics;
    [
        format!("#{} {}  {}", l.id, l.url, l.price),
        format!("  category:          {}", or_dash(l.category.as_deref())),
        format!("  domain rating:     {}", m.domain_rating),
        format!("  referring domains: {}", m.referring_domains),
        format!("  total backlinks:   {}", m.total_backlinks),
        format!("  total keywords:    {}", m.total_keywords),
        format!("  spam score:        {}", m.spam_score),
        format!("  language:          {}", m.language),
        format!("  link validity:     {}", m.link_validity),
        format!("  traffic from:      {}", m.traffic_by_country),
    ]
    .join("\n")
}

#[must_use]
pub fn facets(facets: &Facets) -> String {
    [
        format!("languages:  {}", facets.languages.join(", ")),
        format!("countries:  {}", facets.countries.join(", ")),
        format!("categories: {}", facets.categories.join(", ")),
    ]
    .join("\n")
}

#[must_use]
pub fn cart(cart: &Cart) -> String {
    if cart.is_empty() {
        return "Your cart is empty.".to_string();
    }

    let mut lines: Vec<String> = cart
        .items()
        .iter()
        .map(|item| {
            format!(
                "{}  {:<28} x{:<3} {:>10}",
                item.cart_id,
                item.listing.url,
                item.quantity,
                item.line_total().to_string(),
            )
        })
        .collect();
    match cart.total() {
        Ok(total) => lines.push(format!("Total: {total}")),
        Err(e) => lines.push(format!("Total unavailable: {e}")),
    }
    lines.join("\n")
}

#[must_use]
pub fn orders(orders: &[Order]) -> String {
    if orders.is_empty() {
        return "No orders found.".to_string();
    }

    orders
        .iter()
        .map(|o| {
            let urls: Vec<&str> = o.items.iter().map(|i| i.url.as_str()).collect();
            format!(
                "{}  {}  {:<11} {:>10}  {}",
                o.id,
                o.created_at.format("%Y-%m-%d"),
                o.status.as_str(),
                o.total.to_string(),
                urls.join(", "),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[must_use]
pub fn order(o: &Order) -> String {
    let mut lines = vec![
        format!("Order {}", o.id),
        format!("  status:   {}", o.status),
        format!("  payment:  {}", o.payment_method),
        format!("  delivery: {}", o.delivery_time),
        format!("  placed:   {}", o.created_at.format("%Y-%m-%d %H:%M")),
        format!("  updated:  {}", o.updated_at.format("%Y-%m-%d %H:%M")),
    ];
    lines.extend(o.items.iter().map(|item| {
        format!(
            "  - {:<28} {} x{} = {}",
            item.url, item.price, item.quantity, item.line_total
        )
    }));
    lines.push(format!("  total:    {}", o.total));
    lines.join("\n")
}

#[must_use]
pub fn summary(s: &OrderSummary) -> String {
    [
        format!("orders:      {}", s.total_orders),
        format!("pending:     {}", s.pending_orders),
        format!("in progress: {}", s.in_progress_orders),
        format!("completed:   {}", s.completed_orders),
        format!("cancelled:   {}", s.cancelled_orders),
        format!("spent:       {}", s.total_revenue),
    ]
    .join("\n")
}

const fn kind_label(kind: TransactionKind) -> &'static str {
    match kind {
        TransactionKind::Deposit => "deposit",
        TransactionKind::Bonus => "bonus",
        TransactionKind::Purchase => "purchase",
    }
}

#[must_use]
pub fn wallet(w: &Wallet) -> String {
    let mut lines = vec![format!("Balance: {}", w.balance)];
    lines.extend(w.transactions.iter().map(|tx| {
        format!(
            "  {}  {:<8} {:>11}  {}",
            tx.created_at.format("%Y-%m-%d"),
            kind_label(tx.kind),
            tx.amount.to_string(),
            tx.description,
        )
    }));
    lines.join("\n")
}

#[must_use]
pub fn offers(offers: &[FundsOffer]) -> String {
    offers
        .iter()
        .map(|o| format!("Add ${} get ${} bonus", o.amount, o.bonus))
        .collect::<Vec<_>>()
        .join("\n")
}
