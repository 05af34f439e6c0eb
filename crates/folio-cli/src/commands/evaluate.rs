//! Evaluate command implementation.

use crate::backends::{self, DynProvider};
use crate::cli::EvaluateArgs;
use crate::config::{Config, OutputFormat};
use crate::error::Result;
use crate::output::Formatter;
use folio_eval::{run_evaluation, EvalConfig};
use folio_rag::{RagConfig, RagTutor, Retriever, RetrieverConfig};

/// Execute the evaluate command.
pub fn execute_evaluate(args: EvaluateArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let top_k = args.top_k.unwrap_or(config.retrieval.top_k);
    let index_dir = args.index_dir.unwrap_or_else(|| config.paths.index_dir.clone());
    let eval_config = EvalConfig {
        questions_csv: args.questions_csv,
        out_dir: args.out_dir,
    };

    let embedder = backends::embedder(&config.embedding)?;
    let retriever = Retriever::open(&index_dir, embedder, RetrieverConfig { top_k })?;

    let metrics = if args.use_llm {
        let llm = backends::provider(
            &config.llm,
            args.model.unwrap_or_else(|| config.llm.model.clone()),
            args.temperature.unwrap_or(config.llm.temperature),
            args.max_tokens,
        )?;
        let rag_config = RagConfig {
            language: config.llm.prompt_language,
            ..Default::default()
        };
        let tutor = RagTutor::new(retriever, llm, rag_config);
        run_evaluation(tutor.retriever(), Some(&tutor), &eval_config)?
    } else {
        run_evaluation::<DynProvider>(&retriever, None, &eval_config)?
    };

    if formatter.format() == OutputFormat::Table {
        println!(
            "{}",
            formatter.success(&format!(
                "Evaluation done -> {}",
                eval_config.out_dir.display()
            ))
        );
    }
    println!("{}", formatter.format_metrics(&metrics)?);
    Ok(())
}
