use crate::{config::Settings, domain::ports::Chat};
use anyhow::{anyhow, Result};
use async_openai::{
    config::OpenAIConfig,
    types::{
        ChatCompletionRequestMessage, ChatCompletionRequestMessageContentPartImageArgs,
        ChatCompletionRequestMessageContentPartTextArgs, ChatCompletionRequestUserMessageArgs,
        ChatCompletionRequestUserMessageContentPart, CreateChatCompletionRequestArgs,
        CreateChatCompletionResponse, ImageDetail, ImageUrlArgs, Role,
    },
};
use async_trait::async_trait;
use std::vec::Vec;
use tracing::debug;

/// Chat model reached through an OpenAI compatible endpoint.
#[derive(Debug, Clone)]
pub struct OpenAI {
    openai_client: async_openai::Client<OpenAIConfig>,
    multimodal_model: String,
}

impl OpenAI {
    pub fn new(settings: &Settings) -> Self {
        let openai_config = OpenAIConfig::new()
            .with_api_base(settings.chat_api_base.clone())
            .with_api_key(settings.chat_api_key.clone().unwrap_or_default());
        let openai_client = async_openai::Client::with_config(openai_config);

        OpenAI {
            openai_client,
            multimodal_model: settings.chat_model.clone(),
        }
    }
}

#[async_trait]
impl Chat for OpenAI {
    async fn get_recommendation(&self, prompt: &str, images_base64: &[String]) -> Result<String> {
        let mut content: Vec<ChatCompletionRequestUserMessageContentPart> = vec![
            ChatCompletionRequestMessageContentPartTextArgs::default()
                .text(prompt)
                .build()?
                .into(),
        ];

        for image in images_base64 {
            content.push(
                ChatCompletionRequestMessageContentPartImageArgs::default()
                    .image_url(
                        ImageUrlArgs::default()
                            .url(format!("data:image/jpeg;base64,{}", image))
                            .detail(ImageDetail::High)
                            .build()?,
                    )
                    .build()?
                    .into(),
            );
        }

        let messages: Vec<ChatCompletionRequestMessage> =
            vec![ChatCompletionRequestUserMessageArgs::default()
                .content(content)
                .build()?
                .into()];

        let request = CreateChatCompletionRequestArgs::default()
            .max_tokens(1024u32)
            .model(self.multimodal_model.clone())
            .messages(messages)
            .build()?;

        debug!(
            "OpenAI Request: model {}, {} images",
            self.multimodal_model,
            images_base64.len()
        );
        let response = self.openai_client.chat().create(request).await?;
        let text = process_openai_response(response);
        if text.is_empty() {
            return Err(anyhow!("the model returned no text"));
        }
        Ok(text)
    }
}

fn process_openai_response(response: CreateChatCompletionResponse) -> String {
    response
        .choices
        .iter()
        .filter_map(|c| {
            if c.message.role == Role::Assistant {
                c.message.content.as_deref().map(|s| s.trim())
            } else {
                None
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
