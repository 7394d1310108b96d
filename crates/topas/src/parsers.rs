//! Library of parser functions for the TOPAS comment header

// external crates
use nom::bytes::complete::{tag, take_until, take_while1};
use nom::character::complete::{alpha1, char, digit1, space0, space1};
use nom::combinator::{map, map_res, opt, rest};
use nom::number::complete::double;
use nom::sequence::{delimited, preceded, terminated, tuple};
use nom::IResult;

/// Bins of one spatial axis, e.g. `# X in 10 bins of 0.5 cm`
#[derive(Debug, Clone, PartialEq)]
pub struct AxisBins<'a> {
    pub dimension: &'a str,
    pub n: u32,
    pub width: f64,
    pub unit: &'a str,
}

/// Scored quantity, its unit, and the statistics written as columns
#[derive(Debug, Clone, PartialEq)]
pub struct ScorerColumns<'a> {
    pub quantity: &'a str,
    pub unit: &'a str,
    pub statistics: Vec<&'a str>,
}

/// Differential binning clause, e.g. `# Binned by time in 10 bins ...`
#[derive(Debug, Clone, PartialEq)]
pub struct BinnedBy<'a> {
    pub quantity: &'a str,
    pub n: u32,
    pub width: f64,
    pub unit: &'a str,
    pub min: f64,
    pub max: f64,
}

// ! Boolean checks

/// Check for a comment line
pub fn is_comment(i: &str) -> bool {
    i.starts_with('#')
}

// ! Parser combinators

/// Parameter file the results came from, `# Parameter File: <path>`
pub fn parameter_file(i: &str) -> IResult<&str, &str> {
    map(
        preceded(tuple((tag("#"), space0, tag("Parameter File:"), space0)), rest),
        str::trim,
    )(i)
}

/// Scorer name, `# Results for scorer: <name>`
pub fn scorer_name(i: &str) -> IResult<&str, &str> {
    map(
        preceded(
            tuple((tag("#"), space0, tag("Results for scorer:"), space0)),
            rest,
        ),
        str::trim,
    )(i)
}

/// Spatial axis bins, `# <D> in <n> bin(s) of <w> <unit>`
pub fn axis_bins(i: &str) -> IResult<&str, AxisBins> {
    map(
        tuple((
            preceded(tuple((tag("#"), space0)), alpha1),
            preceded(tuple((space1, tag("in"), space1)), count),
            preceded(bins_of, double),
            preceded(space1, word),
        )),
        |(dimension, n, width, unit)| AxisBins {
            dimension,
            n,
            width,
            unit,
        },
    )(i)
}

/// Quantity with unit and statistic columns, `# <Q> ( <unit> ) : <cols>`
///
/// The unit is optional, as for counts.
pub fn scorer_columns(i: &str) -> IResult<&str, ScorerColumns> {
    let unit = delimited(
        tuple((char('('), space0)),
        map(take_until(")"), str::trim),
        char(')'),
    );

    map(
        tuple((
            preceded(tuple((tag("#"), space0)), alpha1),
            preceded(space0, opt(unit)),
            preceded(tuple((space0, char(':'))), rest),
        )),
        |(quantity, unit, columns): (&str, Option<&str>, &str)| ScorerColumns {
            quantity,
            unit: unit.unwrap_or_default(),
            statistics: columns.split_whitespace().collect(),
        },
    )(i)
}

/// Differential binning clause
///
/// `# Binned by <q> in <n> bins of <w> <unit> from <min> <unit> to <max> <unit>`
pub fn binned_by(i: &str) -> IResult<&str, BinnedBy> {
    map(
        tuple((
            preceded(
                tuple((tag("#"), space0, tag("Binned by"), space1)),
                take_until(" in "),
            ),
            preceded(tag(" in "), count),
            preceded(bins_of, double),
            preceded(space1, word),
            preceded(tuple((space1, tag("from"), space1)), double),
            terminated(
                preceded(tuple((space1, word, space1, tag("to"), space1)), double),
                rest,
            ),
        )),
        |(quantity, n, width, unit, min, max)| BinnedBy {
            quantity: quantity.trim(),
            n,
            width,
            unit,
            min,
            max,
        },
    )(i)
}

/// Number of histories from a parameter file line
///
/// e.g. `i:So/Beam/NumberOfHistoriesInRun = 1000`
pub fn histories(i: &str) -> IResult<&str, u64> {
    preceded(
        tuple((
            take_until("NumberOfHistoriesInRun"),
            tag("NumberOfHistoriesInRun"),
            space0,
            char('='),
            space0,
        )),
        map_res(digit1, str::parse),
    )(i)
}

/// `bin` or `bins` followed by `of`
fn bins_of(i: &str) -> IResult<&str, &str> {
    terminated(
        preceded(tuple((space1, tag("bin"), opt(char('s')), space1)), tag("of")),
        space1,
    )(i)
}

fn count(i: &str) -> IResult<&str, u32> {
    map_res(digit1, str::parse)(i)
}

/// Anything up to the next whitespace, units such as `/mm2` included
fn word(i: &str) -> IResult<&str, &str> {
    take_while1(|c: char| !c.is_whitespace())(i)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parameter_file_test() {
        assert_eq!(
            parameter_file("# Parameter File: run/beam.txt"),
            Ok(("", "run/beam.txt"))
        );
        assert!(parameter_file("# Results for scorer: Dose").is_err());
    }

    #[test]
    fn scorer_name_test() {
        assert_eq!(
            scorer_name("# Results for scorer: DoseAtPhantom"),
            Ok(("", "DoseAtPhantom"))
        );
    }

    #[test]
    fn axis_bins_test() {
        assert_eq!(
            axis_bins("# X in 10 bins of 0.5 cm"),
            Ok((
                "",
                AxisBins {
                    dimension: "X",
                    n: 10,
                    width: 0.5,
                    unit: "cm"
                }
            ))
        );

        // single bins are padded to line up with the plural
        assert_eq!(
            axis_bins("# Phi in 1 bin  of 360 deg"),
            Ok((
                "",
                AxisBins {
                    dimension: "Phi",
                    n: 1,
                    width: 360.0,
                    unit: "deg"
                }
            ))
        );

        assert!(axis_bins("# Binned by time in 10 bins of 1 ns from 0 ns to 10 ns").is_err());
    }

    #[test]
    fn scorer_columns_test() {
        assert_eq!(
            scorer_columns("# DoseToMedium ( Gy ) : Mean   Standard_Deviation"),
            Ok((
                "",
                ScorerColumns {
                    quantity: "DoseToMedium",
                    unit: "Gy",
                    statistics: vec!["Mean", "Standard_Deviation"]
                }
            ))
        );

        assert_eq!(
            scorer_columns("# StepCount : Sum"),
            Ok((
                "",
                ScorerColumns {
                    quantity: "StepCount",
                    unit: "",
                    statistics: vec!["Sum"]
                }
            ))
        );

        // other header lines are not mistaken for results
        assert!(scorer_columns("# Results for scorer: Dose").is_err());
        assert!(scorer_columns("# Parameter File: a.txt").is_err());
        assert!(scorer_columns("# X in 10 bins of 0.5 cm").is_err());
    }

    #[test]
    fn binned_by_test() {
        assert_eq!(
            binned_by("# Binned by incident track energy in 4 bins of 2 MeV from 0 MeV to 8 MeV"),
            Ok((
                "",
                BinnedBy {
                    quantity: "incident track energy",
                    n: 4,
                    width: 2.0,
                    unit: "MeV",
                    min: 0.0,
                    max: 8.0
                }
            ))
        );
    }

    #[test]
    fn histories_test() {
        assert_eq!(
            histories("i:So/Demo/NumberOfHistoriesInRun = 1000"),
            Ok(("", 1000))
        );
        assert_eq!(histories("i:So/Demo/NumberOfHistoriesInRun=25 # beam"), Ok((" # beam", 25)));
        assert!(histories("s:So/Demo/Type = \"Beam\"").is_err());
    }

    #[test]
    fn comments() {
        assert!(is_comment("# X in 1 bin of 1 cm"));
        assert!(!is_comment("0, 0, 0, 1.5"));
    }
}
