//! Prompt construction for commit message generation.

use crate::commit::diff::StagedDiff;

/// System prompt used when the config does not provide `commit_prompt`.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are an assistant that writes excellent git commit messages. \
Based on the diff below, write a concise, descriptive commit message. \
Include the kind of change (feat, fix, refactor, etc.) and follow the conventional commit format: type(scope): description";

/// Fixed instructions asking for the final answer inside a fenced code block.
///
/// Given in Japanese and English so that both local and hosted models follow them.
const FENCED_ANSWER_INSTRUCTIONS: &str = "以下のgit diffに基づいて、日本語で簡潔で説明的なコミットメッセージを生成してください。
必要に応じて複数行のコミットメッセージも生成できます。
最後に、生成したコミットメッセージだけをマークダウンのコードブロック(```)で囲んで出力してください。
Based on the git diff below, write a concise and descriptive commit message.
The message may span several lines when needed.
Finally, output only the commit message wrapped in a markdown code block (```).";

/// Build the user message for chat-completions backends.
pub fn build_user_prompt(diff: &StagedDiff) -> String {
    format!("{FENCED_ANSWER_INSTRUCTIONS}:\n\n{}", diff.as_str())
}

/// Build the single combined prompt for CLI backends, which take no separate system message.
pub fn build_cli_prompt(system_prompt: &str, diff: &StagedDiff) -> String {
    format!(
        "{system_prompt}\n\n{FENCED_ANSWER_INSTRUCTIONS}:\n\n{}",
        diff.as_str()
    )
}
