// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use chrono::{Days, NaiveDate};
use revi_core::{Column, Dataset};

const PRODUCTS: [&str; 4] = ["Consultoria", "Plano Pro", "Treinamento", "Suporte"];
const FLAGS: [&str; 2] = ["Sim", "Nao"];

fn lcg_next(state: &mut u64) -> u64 {
    *state = state
        .wrapping_mul(6364136223846793005)
        .wrapping_add(1442695040888963407);
    *state
}

fn lcg_unit(state: &mut u64) -> f64 {
    (lcg_next(state) >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
}

/// Synthetic marketing dataset with stable pseudo-random contents.
pub fn synthetic_dataset(rows: usize, seed: u64) -> Dataset {
    let mut state = seed ^ 0xfeed_f00d_dead_beef;
    let base = NaiveDate::from_ymd_opt(2024, 1, 1).expect("base date should be valid");

    let mut returns = Vec::with_capacity(rows);
    let mut costs = Vec::with_capacity(rows);
    let mut engagement = Vec::with_capacity(rows);
    let mut products = Vec::with_capacity(rows);
    let mut converted = Vec::with_capacity(rows);
    let mut dates = Vec::with_capacity(rows);

    for idx in 0..rows {
        returns.push(100.0 + lcg_unit(&mut state) * 9_900.0);
        costs.push(10.0 + lcg_unit(&mut state) * 990.0);
        engagement.push(lcg_unit(&mut state) * 100.0);
        products.push(PRODUCTS[(lcg_next(&mut state) % 4) as usize].to_owned());
        converted.push(FLAGS[(lcg_next(&mut state) % 2) as usize].to_owned());
        dates.push(
            base.checked_add_days(Days::new((idx % 365) as u64))
                .expect("synthetic date should be valid"),
        );
    }

    Dataset::new(vec![
        ("Valor_Venda".to_owned(), Column::Numeric(returns)),
        ("CAC".to_owned(), Column::Numeric(costs)),
        ("Score_Engajamento".to_owned(), Column::Numeric(engagement)),
        ("Produto".to_owned(), Column::Categorical(products)),
        ("Converteu".to_owned(), Column::Categorical(converted)),
        ("Data_Venda".to_owned(), Column::Date(dates)),
    ])
    .expect("synthetic dataset should be valid")
}
