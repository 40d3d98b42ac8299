//! Context compaction: fit quotes and headlines into a character budget.
//!
//! Quotes go first, then headlines newest-first. Items are taken whole; the
//! first one that does not fit ends its section and everything behind it is
//! dropped, so the output only depends on input order and budget.

use crate::domain::entities::compacted_context::{
    render_parts, CompactedContext, HEADLINES_HEADER, QUOTES_HEADER,
};
use crate::domain::entities::headline::Headline;
use crate::domain::entities::quote_snapshot::QuoteSnapshot;

pub fn compact(
    quotes: &[QuoteSnapshot],
    headlines: &[Headline],
    char_budget: usize,
) -> CompactedContext {
    compact_with_extra_quotes(quotes, headlines, &[], char_budget)
}

/// Like [`compact`], but `extra_quotes` only get the budget left after
/// `quotes` and `headlines` are packed, so they can never push a headline
/// out. They are rendered after `quotes` in the quote section.
pub fn compact_with_extra_quotes(
    quotes: &[QuoteSnapshot],
    headlines: &[Headline],
    extra_quotes: &[QuoteSnapshot],
    char_budget: usize,
) -> CompactedContext {
    let mut budget = Budget::new(char_budget);
    let mut quote_header = false;
    let mut headline_header = false;

    let mut kept_quotes = take_fitting(
        quotes,
        QuoteSnapshot::context_line,
        QUOTES_HEADER,
        &mut quote_header,
        &mut budget,
    );
    let kept_headlines = take_fitting(
        headlines,
        Headline::context_line,
        HEADLINES_HEADER,
        &mut headline_header,
        &mut budget,
    );
    kept_quotes.extend(take_fitting(
        extra_quotes,
        QuoteSnapshot::context_line,
        QUOTES_HEADER,
        &mut quote_header,
        &mut budget,
    ));

    debug_assert_eq!(
        render_parts(&kept_quotes, &kept_headlines).chars().count(),
        budget.rendered_len()
    );

    CompactedContext::new(kept_quotes, kept_headlines, char_budget)
}

/// Lines are joined with `\n`, so the rendered length is the sum of
/// `chars + 1` over all lines, minus one. That sum does not depend on
/// where a line ends up, which lets sections be filled in any order.
struct Budget {
    limit: usize,
    spent: usize,
}

impl Budget {
    fn new(limit: usize) -> Self {
        Self { limit, spent: 0 }
    }

    /// Takes all of `lines` or none of them.
    fn take(&mut self, lines: &[&str]) -> bool {
        let cost: usize = lines.iter().map(|l| l.chars().count() + 1).sum();
        if self.spent + cost > self.limit + 1 {
            return false;
        }
        self.spent += cost;
        true
    }

    fn rendered_len(&self) -> usize {
        self.spent.saturating_sub(1)
    }
}

/// Takes the longest prefix of `items` whose lines fit. The section header
/// is paid for together with the section's first line.
fn take_fitting<T: Clone>(
    items: &[T],
    line: impl Fn(&T) -> String,
    header: &str,
    header_paid: &mut bool,
    budget: &mut Budget,
) -> Vec<T> {
    let mut kept = Vec::new();
    for item in items {
        let text = line(item);
        let fits = if *header_paid {
            budget.take(&[text.as_str()])
        } else {
            budget.take(&[header, text.as_str()])
        };
        if !fits {
            break;
        }
        *header_paid = true;
        kept.push(item.clone());
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::values::market_scope::MarketScope;
    use crate::domain::values::price::Price;

    fn quote(symbol: &str, price: f64) -> QuoteSnapshot {
        QuoteSnapshot::new(symbol.into(), symbol.into(), Price::Known(price), 1.0, 100)
    }

    fn headlines(n: usize) -> Vec<Headline> {
        (0..n)
            .map(|i| Headline::new(format!("Headline number {i} about markets"), MarketScope::International))
            .collect()
    }

    #[test]
    fn test_everything_fits() {
        let q = vec![quote("AAPL", 150.0)];
        let h = headlines(3);
        let ctx = compact(&q, &h, 10_000);
        assert_eq!(ctx.quotes.len(), 1);
        assert_eq!(ctx.headlines.len(), 3);
        let text = ctx.render();
        assert!(text.starts_with("QUOTES\nAAPL (AAPL): price 150.00"));
        assert!(text.contains("HEADLINES\n- [international] Headline number 0"));
    }

    #[test]
    fn test_budget_respected_for_every_size() {
        let q = vec![quote("AAPL", 150.0), quote("2330.TW", 1000.0)];
        let h = headlines(12);
        for budget in 0..600 {
            let ctx = compact(&q, &h, budget);
            assert!(
                ctx.render().chars().count() <= budget,
                "budget {budget} exceeded"
            );
        }
    }

    #[test]
    fn test_drops_oldest_headlines_first() {
        let h = headlines(10);
        let full = compact(&[], &h, 10_000).render().chars().count();
        let ctx = compact(&[], &h, full - 1);
        assert_eq!(ctx.headlines.len(), 9);
        assert_eq!(ctx.headlines[..], h[..9]);
    }

    #[test]
    fn test_never_cuts_mid_headline() {
        let h = headlines(5);
        let ctx = compact(&[], &h, 60);
        for line in ctx.render().lines().skip(1) {
            assert!(h.iter().any(|x| x.context_line() == line));
        }
    }

    #[test]
    fn test_zero_budget_is_empty() {
        let ctx = compact(&[quote("AAPL", 1.0)], &headlines(2), 0);
        assert!(ctx.quotes.is_empty());
        assert!(ctx.headlines.is_empty());
        assert_eq!(ctx.render(), "");
    }

    #[test]
    fn test_deterministic_and_prefix_consistent() {
        let q = vec![quote("AAPL", 150.0)];
        let h = headlines(8);
        let a = compact(&q, &h, 300);
        let b = compact(&q, &h, 300);
        assert_eq!(a.render(), b.render());
        let bigger = compact(&q, &h, 400);
        assert!(bigger.render().starts_with(&a.render()));
    }

    #[test]
    fn test_extra_quotes_never_displace_headlines() {
        let seed = vec![quote("AAPL", 150.0)];
        let h = headlines(2);
        let extra = vec![quote("MSFT", 410.0), quote("NVDA", 120.0)];
        let without_extra = compact(&seed, &h, 10_000).render().chars().count();

        let ctx = compact_with_extra_quotes(&seed, &h, &extra, without_extra);
        assert_eq!(ctx.headlines, h);
        assert_eq!(ctx.quotes, seed);

        let roomy = compact_with_extra_quotes(&seed, &h, &extra, 10_000);
        let symbols: Vec<&str> = roomy.quotes.iter().map(|q| q.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["AAPL", "MSFT", "NVDA"]);
        assert_eq!(roomy.headlines.len(), 2);
    }

    #[test]
    fn test_extra_quotes_alone_get_a_header() {
        let extra = vec![quote("MSFT", 410.0)];
        let ctx = compact_with_extra_quotes(&[], &headlines(1), &extra, 10_000);
        assert!(ctx.render().starts_with("QUOTES\nMSFT (MSFT)"));
        for budget in 0..200 {
            let ctx = compact_with_extra_quotes(&[], &headlines(3), &extra, budget);
            assert!(ctx.render().chars().count() <= budget);
        }
    }

    #[test]
    fn test_multibyte_headlines_counted_in_chars() {
        let h = vec![Headline::new("台積電法說會釋出利多消息", MarketScope::Domestic)];
        let line = h[0].context_line();
        let exact = "HEADLINES".chars().count() + 1 + line.chars().count();
        assert_eq!(compact(&[], &h, exact).headlines.len(), 1);
        assert!(compact(&[], &h, exact - 1).headlines.is_empty());
    }
}
