//! Default values for configuration

/// Default OpenAI-compatible API base URL
pub fn default_openai_base_url() -> String {
    "https://api.openai.com".to_string()
}

/// Default environment variable name for the OpenAI API key
pub fn default_openai_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

/// Default embedding model
pub fn default_embedding_model() -> String {
    "text-embedding-ada-002".to_string()
}

/// Default chat model
pub fn default_chat_model() -> String {
    "gpt-4".to_string()
}

/// Default Pinecone index name
pub fn default_index_name() -> String {
    "rag-demo".to_string()
}

/// Default environment variable name for the Pinecone API key
pub fn default_index_api_key_env() -> String {
    "PINECONE_API_KEY".to_string()
}

/// Default Pinecone control plane URL
pub fn default_index_control_url() -> String {
    "https://api.pinecone.io".to_string()
}

/// Default number of fragments retrieved per query
pub fn default_top_k() -> usize {
    3
}

/// System instruction for answer generation
pub fn default_rag_system_prompt() -> String {
    "You are an AI that extracts answers from given text.".to_string()
}

/// System instruction for the interactive chat
pub fn default_chat_system_prompt() -> String {
    "You are a helpful assistant.".to_string()
}

/// Default smoke check target
pub fn default_smoke_url() -> String {
    "http://gdgoc-demo.vercel.app/ask".to_string()
}

/// Default smoke check question
pub fn default_smoke_question() -> String {
    "What is the capital of France?".to_string()
}

/// Default outbound request timeout in seconds
pub fn default_timeout_secs() -> u64 {
    60
}
