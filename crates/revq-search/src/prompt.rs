//! Prompt templates for answer generation and self-query translation.

/// Fixed refusal returned whenever the answer is not in the retrieved
/// context.
pub const REFUSAL: &str = "Não tenho informações necessárias para responder sua pergunta.";

/// Grounded-answer prompt: the model may only use the supplied context and
/// must fall back to [`REFUSAL`] for anything else.
#[must_use]
pub fn answer_prompt(context: &str, question: &str) -> String {
    format!(
        "CONTEXTO:\n{context}\n\n\
         REGRAS:\n\
         - Responda somente com base no CONTEXTO.\n\
         - Se a informação não estiver explicitamente no CONTEXTO, responda:\n\
         \x20 \"{REFUSAL}\"\n\
         - Nunca invente ou use conhecimento externo.\n\
         - Nunca produza opiniões ou interpretações além do que está escrito.\n\n\
         EXEMPLOS DE PERGUNTAS FORA DO CONTEXTO:\n\
         Pergunta: \"Qual é a capital da França?\"\n\
         Resposta: \"{REFUSAL}\"\n\n\
         Pergunta: \"Quantos clientes temos em 2024?\"\n\
         Resposta: \"{REFUSAL}\"\n\n\
         Pergunta: \"Você acha isso bom ou ruim?\"\n\
         Resposta: \"{REFUSAL}\"\n\n\
         PERGUNTA DO USUÁRIO:\n{question}\n\n\
         RESPONDA A \"PERGUNTA DO USUÁRIO\""
    )
}

/// System prompt for translating a question into a structured query over
/// the chunk metadata schema.
#[must_use]
pub fn self_query_prompt() -> String {
    "Você traduz perguntas do usuário em uma consulta estruturada sobre chunks de documentos.\n\
     \n\
     Os documentos contêm informações sobre empresas brasileiras incluindo seus nomes, \
     faturamento anual (em R$) e ano de fundação. Cada chunk contém dados de uma ou mais \
     empresas, ordenadas por faturamento crescente.\n\
     \n\
     Campos de metadados disponíveis para filtro:\n\
     - min_revenue (float): valor mínimo de faturamento (em Reais) das empresas neste chunk. \
     Para empresas com faturamento INFERIOR a um valor X, use min_revenue menor que X. \
     Para empresas com faturamento SUPERIOR a um valor X, use min_revenue maior que X.\n\
     - max_revenue (float): valor máximo de faturamento (em Reais) das empresas neste chunk. \
     Para empresas com faturamento INFERIOR a um valor X, use max_revenue menor que X. \
     Para empresas com faturamento SUPERIOR a um valor X, use max_revenue maior que X. \
     Para uma faixa específica, combine min_revenue e max_revenue.\n\
     - file_name (string): o nome do arquivo PDF do qual este chunk foi extraído.\n\
     - creation_date (string): a data em formato ISO de quando este documento foi \
     ingerido no sistema.\n\
     \n\
     Responda com a consulta de similaridade reescrita em `query`, os limites numéricos \
     em `filter` (somente quando a pergunta pedir um recorte) e, se a pergunta pedir uma \
     quantidade específica de resultados, `limit`."
        .to_owned()
}
