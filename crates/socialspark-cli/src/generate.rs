use socialspark_core::format_hashtags;
use socialspark_store::Bucket;
use socialspark_studio::{GenerationRequest, Generator};

use crate::app::{ctrl_c_token, App};
use crate::GenerateArgs;

pub(crate) async fn run_generate(app: &App, args: GenerateArgs) -> anyhow::Result<()> {
    let request = GenerationRequest {
        idea: args.idea,
        platform: args.platform,
        content_type: args.content_type,
        tone: args.tone,
        business_type: args.business,
        language: args.language.unwrap_or(app.config.default_language),
        hashtags_count: args.hashtags_count,
        number_of_shots: args.number_of_shots,
        cta: args.cta,
        aspect_ratio: args.aspect_ratio,
        brand_presets: app.brand_presets(args.brand.as_deref())?,
        wait_for_render: !args.no_wait,
    };

    let generated = Generator::new(&app.client)
        .with_poll_policy(app.poll_policy())
        .generate(&request, &ctrl_c_token(), |stage| {
            eprintln!("[{:>3}%] {stage}", stage.percent());
        })
        .await?;

    let draft = &generated.draft;
    println!("title:    {}", draft.title);
    println!("caption:  {}", draft.caption);
    println!("hashtags: {}", format_hashtags(&draft.hashtags));
    if let Some(url) = &draft.image_url {
        println!("image:    {url}");
    }
    if let Some(shots) = &draft.storyboard {
        for (i, shot) in shots.iter().enumerate() {
            println!("shot {}:   {:>4.1}s {}", i + 1, shot.duration, shot.text);
        }
    }
    if let Some(task) = &generated.render_task {
        match &task.video_url {
            Some(url) => println!("video:    {url}"),
            None => println!(
                "video:    task {} is {}; run `socialspark task wait {}`",
                task.task_id, task.status, task.task_id
            ),
        }
    }

    if let Some(bucket) = args.save {
        let id = app.store.save_content(bucket, generated.draft).await?;
        println!("saved to {bucket} as {id}");
        let pending = generated
            .render_task
            .as_ref()
            .filter(|task| task.video_url.is_none());
        if let (Some(task), Bucket::Library) = (pending, bucket) {
            println!(
                "run `socialspark task wait {} --draft {id}` to attach the video",
                task.task_id
            );
        }
    }
    Ok(())
}
