use anyhow::{Context, Result};
use bayesnet::common::setup::{OutputFormat, parse_configuration_options};
use bayesnet::graph::{MarginalTable, Network};
use bayesnet::scenarios::factory::ScenarioMakerFactory;
use bayesnet::{print_blue, print_green, print_probability, print_red, print_yellow};
use log::info;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct Answer {
    query: String,
    probability: f64,
}

#[derive(Debug, Serialize)]
struct Report {
    scenario: String,
    answers: Vec<Answer>,
    marginals: MarginalTable,
}

/// Competing explanations for wet grass, asked when no query is given
const EXPLANATIONS: [(&str, &str, &str); 2] = [
    ("cloudy", "P(R|W,C)", "P(S|W,C)"),
    ("clear", "P(R|W,~C)", "P(S|W,~C)"),
];

fn answer(network: &Network, query: &str) -> Result<Answer> {
    let probability = network
        .query(query)
        .with_context(|| format!("failed to evaluate {}", query))?;
    info!("{} = {}", query, probability);
    Ok(Answer {
        query: query.to_string(),
        probability,
    })
}

fn explain_wet_grass(network: &Network, text: bool) -> Result<Vec<Answer>> {
    let mut answers = Vec::new();
    for (weather, rain_query, sprinkler_query) in EXPLANATIONS {
        let rain = answer(network, rain_query)?;
        let sprinkler = answer(network, sprinkler_query)?;
        if text {
            print_blue!("The grass is wet and the sky is {}. What is the most probable cause?", weather);
            print_probability!(rain.query, rain.probability);
            print_probability!(sprinkler.query, sprinkler.probability);
            let cause = if rain.probability >= sprinkler.probability {
                "rain"
            } else {
                "the sprinkler"
            };
            print_yellow!("Most probable cause: {}", cause);
        }
        answers.push(rain);
        answers.push(sprinkler);
    }
    Ok(answers)
}

fn run() -> Result<()> {
    let options = parse_configuration_options();
    info!("options: {:?}", options);

    let mut network = ScenarioMakerFactory::build(&options.scenario)
        .with_context(|| format!("failed to build scenario '{}'", options.scenario))?;
    for assignment in options.evidence_assignments()? {
        network
            .set_evidence(&assignment.id, assignment.value)
            .with_context(|| format!("cannot observe {}", assignment))?;
    }

    let text = options.format == OutputFormat::Text;
    let answers = if options.queries.is_empty() && options.scenario == "sprinkler" {
        explain_wet_grass(&network, text)?
    } else {
        let mut answers = Vec::with_capacity(options.queries.len());
        for query in &options.queries {
            let answer = answer(&network, query)?;
            if text {
                print_probability!(answer.query, answer.probability);
            }
            answers.push(answer);
        }
        answers
    };

    let marginals = network.marginals().context("failed to compute marginals")?;
    match options.format {
        OutputFormat::Text => {
            print_green!("Marginals");
            print!("{}", marginals.render_marginal_table());
        }
        OutputFormat::Json => {
            let report = Report {
                scenario: options.scenario.clone(),
                answers,
                marginals,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    run().inspect_err(|e| {
        print_red!("{:#}", e);
    })
}
