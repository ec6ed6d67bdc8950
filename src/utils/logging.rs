use tracing_subscriber::EnvFilter;

/// Quantidade de bytes de um segredo exibidos nos logs
const VISIBLE_PREFIX: usize = 6;

/// Instala o subscriber `fmt` com filtro vindo de `RUST_LOG` (padrão `info`)
///
/// Pode ser chamada mais de uma vez; as chamadas seguintes são ignoradas.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// Reduz um token / code a um prefixo curto seguido de `...`, sem cortar caracteres UTF-8
pub fn redact(secret: &str) -> String {
    if secret.len() <= VISIBLE_PREFIX {
        return "***".to_string();
    }

    let mut end = VISIBLE_PREFIX;
    while end > 0 && !secret.is_char_boundary(end) {
        end -= 1;
    }

    format!("{}...", &secret[..end])
}

pub fn log_request_sent(method: &str, url: &str) {
    tracing::debug!("➡️  [GitHub] {} {}", method, url);
}

pub fn log_response_received(method: &str, url: &str, status: u16) {
    tracing::debug!("⬅️  [GitHub] {} {} -> {}", method, url, status);
}
