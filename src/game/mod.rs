pub mod tipp_evaluator;
