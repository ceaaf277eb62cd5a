use anyhow::{Context, Result, anyhow, bail};
use gymtrack::models::{NewDropset, NewSeries};

/// Parses one series written as `WEIGHTxREPS[@RPE][+WEIGHTxREPS...]`,
/// e.g. `100x5@8+80x8+60x10`. Weights may carry a `kg` suffix.
pub fn parse_series(input: &str) -> Result<NewSeries> {
    let mut parts = input.split('+');
    let main = parts
        .next()
        .filter(|p| !p.trim().is_empty())
        .ok_or_else(|| anyhow!("empty series"))?;

    let (main, rpe) = match main.split_once('@') {
        Some((set, rpe)) => {
            let rpe: f32 = rpe
                .trim()
                .parse()
                .with_context(|| format!("invalid RPE in {:?}", input))?;
            (set, Some(rpe))
        }
        None => (main, None),
    };
    let (weight, reps) = parse_set(main).with_context(|| format!("invalid series {:?}", input))?;

    let dropsets = parts
        .map(|p| {
            parse_set(p)
                .map(|(weight, reps)| NewDropset { reps, weight })
                .with_context(|| format!("invalid dropset {:?} in {:?}", p, input))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(NewSeries {
        reps,
        weight,
        rpe,
        dropsets,
    })
}

fn parse_set(set: &str) -> Result<(f64, u32)> {
    let set = set.trim().to_lowercase();
    let Some((weight, reps)) = set.split_once('x') else {
        bail!("expected WEIGHTxREPS, got {:?}", set);
    };
    let weight: f64 = weight.trim().trim_end_matches("kg").trim().parse()?;
    let reps: u32 = reps.trim().parse()?;
    Ok((weight, reps))
}
