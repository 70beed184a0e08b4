use super::table::Cell;

pub const SATOSHI_PER_BTC: f64 = 1e8;
pub const GWEI_PER_ETH: f64 = 1e9;

fn as_f64(cell: &Cell) -> Option<f64> {
    match cell {
        Cell::Int(i) => Some(*i as f64),
        Cell::Float(x) => Some(*x),
        // ethereum amounts arrive as decimal strings since they overflow i64
        Cell::Text(s) => s.trim().parse().ok(),
        Cell::Empty | Cell::Bool(_) => None,
    }
}

fn scale(cell: &Cell, divisor: f64) -> Cell {
    as_f64(cell)
        .map(|amount| Cell::Float(amount / divisor))
        .unwrap_or(Cell::Empty)
}

pub fn satoshi_to_btc(cell: &Cell) -> Cell {
    scale(cell, SATOSHI_PER_BTC)
}

pub fn gwei_to_eth(cell: &Cell) -> Cell {
    scale(cell, GWEI_PER_ETH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_satoshi() {
        assert_eq!(satoshi_to_btc(&Cell::Int(150_000_000)), Cell::Float(1.5));
        assert_eq!(satoshi_to_btc(&Cell::Int(0)), Cell::Float(0.0));
        assert_eq!(satoshi_to_btc(&Cell::Empty), Cell::Empty);
    }

    #[test]
    fn divides_by_exact_power_of_ten() {
        // multiplying by 1e-8 would give 1.2345678900000001
        assert_eq!(
            satoshi_to_btc(&Cell::Int(123_456_789)),
            Cell::Float(1.234_567_89)
        );
    }

    #[test]
    fn converts_gwei_strings() {
        assert_eq!(
            gwei_to_eth(&Cell::Text("2500000000".to_string())),
            Cell::Float(2.5)
        );
        assert_eq!(gwei_to_eth(&Cell::Text("n/a".to_string())), Cell::Empty);
        assert_eq!(gwei_to_eth(&Cell::Bool(true)), Cell::Empty);
    }
}
