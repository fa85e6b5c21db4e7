use staffplan_core::{
    monthly_hours, seasonal_factor, seasonal_template, task_requirement, CapacityModel,
    Period, SeasonalMode, TimeUnit, FLAT_CURVE, SEASONAL_TEMPLATES,
};

// ── Helpers ──────────────────────────────────────────────────────────────────

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

// ── Tests ────────────────────────────────────────────────────────────────────

/// Daily volumes scale by 22 working days: 10/day × 30 min
/// = 10 × 22 × 30 / 60 = 110 monthly hours.
#[test]
fn daily_volume_scales_by_22_working_days() {
    let hours = monthly_hours(
        10.0,
        Period::Daily,
        30.0,
        TimeUnit::Minutes,
        &FLAT_CURVE,
        &SeasonalMode::Annual,
    );
    assert!(close(hours, 110.0), "Expected 110 monthly hours, got {hours}");
}

/// Weekly volumes scale by 4.33 weeks: 10/week × 60 min = 43.3 monthly hours.
#[test]
fn weekly_volume_scales_by_4_33_weeks() {
    let hours = monthly_hours(
        10.0,
        Period::Weekly,
        60.0,
        TimeUnit::Minutes,
        &FLAT_CURVE,
        &SeasonalMode::Annual,
    );
    assert!(close(hours, 43.3), "Expected 43.3 monthly hours, got {hours}");
}

/// Yearly volumes divide by 12: 120/year × 60 min = 10 monthly hours.
#[test]
fn yearly_volume_divides_by_12() {
    let hours = monthly_hours(
        120.0,
        Period::Yearly,
        60.0,
        TimeUnit::Minutes,
        &FLAT_CURVE,
        &SeasonalMode::Annual,
    );
    assert!(close(hours, 10.0), "Expected 10 monthly hours, got {hours}");
}

/// Durations in seconds convert down: 100/month × 3600 s = 100 × 60 min
/// = 100 hours.
#[test]
fn seconds_convert_to_minutes() {
    let hours = monthly_hours(
        100.0,
        Period::Monthly,
        3600.0,
        TimeUnit::Seconds,
        &FLAT_CURVE,
        &SeasonalMode::Annual,
    );
    assert!(close(hours, 100.0), "Expected 100 monthly hours, got {hours}");
}

/// Durations in hours convert up: 50/month × 2 h = 100 hours.
#[test]
fn hours_convert_to_minutes() {
    let hours = monthly_hours(
        50.0,
        Period::Monthly,
        2.0,
        TimeUnit::Hours,
        &FLAT_CURVE,
        &SeasonalMode::Annual,
    );
    assert!(close(hours, 100.0), "Expected 100 monthly hours, got {hours}");
}

/// Non-positive volume or duration yields zero hours, never NaN or a negative.
#[test]
fn degenerate_inputs_yield_zero_hours() {
    let mode = SeasonalMode::Annual;
    let cases = [
        monthly_hours(0.0, Period::Monthly, 30.0, TimeUnit::Minutes, &FLAT_CURVE, &mode),
        monthly_hours(-5.0, Period::Daily, 30.0, TimeUnit::Minutes, &FLAT_CURVE, &mode),
        monthly_hours(10.0, Period::Monthly, 0.0, TimeUnit::Minutes, &FLAT_CURVE, &mode),
        monthly_hours(10.0, Period::Monthly, -1.0, TimeUnit::Hours, &FLAT_CURVE, &mode),
    ];
    for (i, hours) in cases.iter().enumerate() {
        assert!(
            *hours == 0.0,
            "Case {i}: expected exactly 0 hours, got {hours}"
        );
    }
}

/// The seasonal factor multiplies straight through: 100 flat hours priced
/// at July on the summer-lull curve become 60.
#[test]
fn seasonal_factor_scales_the_result() {
    let curve = seasonal_template("summer_lull").unwrap().multipliers;
    let hours = monthly_hours(
        200.0,
        Period::Monthly,
        30.0,
        TimeUnit::Minutes,
        &curve,
        &SeasonalMode::Specific { month: 7 },
    );
    assert!(close(hours, 60.0), "Expected 60 monthly hours, got {hours}");
}

/// Specific-month planning reads one slot of the curve. July on the
/// summer-lull curve is 0.6.
#[test]
fn specific_month_reads_one_curve_slot() {
    let curve = seasonal_template("summer_lull").unwrap().multipliers;

    let factor = seasonal_factor(&curve, &SeasonalMode::Specific { month: 7 });
    assert!(close(factor, 0.6), "Expected July factor 0.6, got {factor}");

    let factor = seasonal_factor(&curve, &SeasonalMode::Specific { month: 10 });
    assert!(close(factor, 1.1), "Expected October factor 1.1, got {factor}");
}

/// Peak mode averages the 3 largest multipliers. On the sales curve
/// those are 1.5, 1.4 and 1.2, so the factor is 4.1 / 3.
#[test]
fn peak_mode_averages_the_three_largest() {
    let curve = seasonal_template("sales_campaign").unwrap().multipliers;
    let factor = seasonal_factor(&curve, &SeasonalMode::Peak);
    assert!(
        close(factor, 4.1 / 3.0),
        "Expected peak factor {}, got {factor}",
        4.1 / 3.0
    );
}

/// Low mode averages the 3 smallest multipliers. On the sales curve
/// those are 0.7, 0.8 and 0.8, so the factor is 2.3 / 3.
#[test]
fn low_mode_averages_the_three_smallest() {
    let curve = seasonal_template("sales_campaign").unwrap().multipliers;
    let factor = seasonal_factor(&curve, &SeasonalMode::Low);
    assert!(
        close(factor, 2.3 / 3.0),
        "Expected low factor {}, got {factor}",
        2.3 / 3.0
    );
}

/// Annual mode averages the whole year. The summer-lull curve sums to 11.2,
/// so the factor is 11.2 / 12.
#[test]
fn annual_mode_averages_the_whole_curve() {
    let curve = seasonal_template("summer_lull").unwrap().multipliers;
    let factor = seasonal_factor(&curve, &SeasonalMode::Annual);
    assert!(
        close(factor, 11.2 / 12.0),
        "Expected annual factor {}, got {factor}",
        11.2 / 12.0
    );
}

/// On a flat curve every mode lands on 1.0, so strategy comparisons
/// start from the same baseline.
#[test]
fn flat_curve_is_neutral_in_every_mode() {
    let modes = [
        SeasonalMode::Annual,
        SeasonalMode::Peak,
        SeasonalMode::Low,
        SeasonalMode::Specific { month: 1 },
        SeasonalMode::Specific { month: 12 },
    ];
    for mode in &modes {
        let factor = seasonal_factor(&FLAT_CURVE, mode);
        assert!(
            close(factor, 1.0),
            "Expected factor 1.0 on the flat curve for {mode:?}, got {factor}"
        );
    }
}

/// The template catalog carries unique ids, starts with the flat curve,
/// and every multiplier is positive.
#[test]
fn template_catalog_is_well_formed() {
    assert!(
        SEASONAL_TEMPLATES.len() >= 5,
        "Expected at least 5 templates, got {}",
        SEASONAL_TEMPLATES.len()
    );
    assert_eq!(SEASONAL_TEMPLATES[0].id, "flat");

    for (i, a) in SEASONAL_TEMPLATES.iter().enumerate() {
        for b in &SEASONAL_TEMPLATES[i + 1..] {
            assert_ne!(a.id, b.id, "Duplicate template id {}", a.id);
        }
        for m in &a.multipliers {
            assert!(*m > 0.0, "Template {} has non-positive multiplier {m}", a.id);
        }
    }

    assert!(
        seasonal_template("no_such_curve").is_none(),
        "Unknown template ids must come back as None"
    );
}

/// The quick calculation exposes every intermediate step: 10/day at
/// 30 minutes is 220 units, 6600 minutes, 110 hours a month, and at
/// 160 h × 0.85 one head covers 136 h, so 110/136 heads are needed.
#[test]
fn quick_calculation_breaks_the_requirement_down() {
    let model = CapacityModel { working_hours_per_month: 160.0, efficiency_factor: 0.85 };
    let breakdown = task_requirement(10.0, Period::Daily, 30.0, TimeUnit::Minutes, &model);

    assert!(close(breakdown.monthly_volume, 220.0));
    assert!(close(breakdown.minutes_per_unit, 30.0));
    assert!(close(breakdown.total_minutes, 6600.0));
    assert!(close(breakdown.total_hours, 110.0));
    assert!(
        close(breakdown.required_headcount, 110.0 / 136.0),
        "Expected 110/136 heads, got {}",
        breakdown.required_headcount
    );
}

/// Unit conversion feeds the quick calculation too: 100 yearly units at
/// 3600 seconds each are 500 monthly minutes.
#[test]
fn quick_calculation_converts_units() {
    let model = CapacityModel { working_hours_per_month: 160.0, efficiency_factor: 1.0 };
    let breakdown = task_requirement(100.0, Period::Yearly, 3600.0, TimeUnit::Seconds, &model);

    assert!(close(breakdown.monthly_volume, 100.0 / 12.0));
    assert!(close(breakdown.minutes_per_unit, 60.0));
    assert!(close(breakdown.total_minutes, 500.0));
    assert!(close(breakdown.total_hours, 500.0 / 60.0));
}

/// A zero-capacity model cannot divide: the headcount reads 0, not NaN.
#[test]
fn quick_calculation_guards_zero_capacity() {
    let model = CapacityModel { working_hours_per_month: 160.0, efficiency_factor: 0.0 };
    let breakdown = task_requirement(50.0, Period::Monthly, 10.0, TimeUnit::Minutes, &model);

    assert!(close(breakdown.total_hours, 500.0 / 60.0));
    assert!(close(breakdown.required_headcount, 0.0), "Zero capacity must not divide");
    assert!(breakdown.required_headcount.is_finite());
}

/// Period and unit names round-trip through their parsers, and unknown
/// names are rejected rather than guessed.
#[test]
fn period_and_unit_names_round_trip() {
    for period in [Period::Daily, Period::Weekly, Period::Monthly, Period::Yearly] {
        assert_eq!(Period::from_name(period.name()), Some(period));
    }
    for unit in [TimeUnit::Seconds, TimeUnit::Minutes, TimeUnit::Hours] {
        assert_eq!(TimeUnit::from_name(unit.name()), Some(unit));
    }
    assert_eq!(Period::from_name("fortnightly"), None);
    assert_eq!(TimeUnit::from_name("days"), None);
}
