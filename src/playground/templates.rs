//! Canned response texts

pub const EXPLANATION: &str = "Here's an explanation of the concept:\n\nThe concept involves integrating multiple large language models (LLMs) to create a more robust and versatile system. By combining models with different strengths, the system can leverage the unique capabilities of each model while mitigating their individual weaknesses.\n\nThis approach, often called model ensembling, allows for more consistent responses and better handling of edge cases that might confuse a single model.";

pub const COMPARISON: &str = "Here's a comparison:\n\n| Feature | Model A | Model B |\n|---------|---------|--------|\n| Parameters | 7B | 70B |\n| Training Data | 1T tokens | 8T tokens |\n| Context Length | 4K | 32K |\n| Inference Speed | Faster | Slower |\n| Reasoning | Good | Excellent |\n\nModel A excels in efficiency and speed, making it suitable for applications with latency constraints, while Model B provides superior reasoning and handles complex tasks more effectively at the cost of higher computational requirements.";

pub const LIST: &str = "Here's a list of items:\n\n1. Prompt engineering techniques\n2. Few-shot learning strategies\n3. Chain-of-thought prompting\n4. Output format control\n5. System message optimization\n6. Context window management\n7. Retrieval-augmented generation";

pub const RECOMMENDATION: &str = "Based on my analysis, the optimal approach would be to implement a retrieval-augmented generation (RAG) system that combines the strengths of both dense retrieval and sparse retrieval methods. This hybrid approach can significantly improve the quality and relevance of generated responses.\n\nThe system would first use a vector database to find semantically similar content, then apply keyword-based filtering to ensure precision. For your specific use case, I recommend starting with a smaller model fine-tuned on domain-specific data rather than immediately deploying a larger, more general model.";

/// Keyword rules in precedence order. First match wins; no match falls back
/// to [`RECOMMENDATION`].
pub const RESPONSE_RULES: &[(&[&str], &str)] = &[
    (&["explain"], EXPLANATION),
    (&["compare"], COMPARISON),
    (&["list", "what are"], LIST),
];
