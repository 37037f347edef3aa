use super::*;

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["socialspark"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
}

#[test]
fn generate_defaults_to_an_instagram_image() {
    let cli = Cli::try_parse_from(["socialspark", "generate", "--idea", "new latte"]).unwrap();
    let Some(Commands::Generate(args)) = cli.command else {
        panic!("expected generate command");
    };
    assert_eq!(args.idea, "new latte");
    assert_eq!(args.platform, Platform::Instagram);
    assert_eq!(args.content_type, ContentType::Image);
    assert_eq!(args.tone, Tone::Playful);
    assert_eq!(args.business, BusinessType::Cafe);
    assert_eq!(args.language, None);
    assert_eq!(args.hashtags_count, 4);
    assert_eq!(args.number_of_shots, 3);
    assert!(!args.no_wait);
    assert!(args.save.is_none());
}

#[test]
fn generate_accepts_video_options() {
    let cli = Cli::try_parse_from([
        "socialspark",
        "generate",
        "--idea",
        "ቡና ceremony",
        "--platform",
        "tiktok",
        "--type",
        "video",
        "--language",
        "am",
        "--shots",
        "5",
        "--cta",
        "Visit us today",
        "--brand",
        "Addis Cafe",
        "--no-wait",
        "--save",
        "library",
    ])
    .unwrap();
    let Some(Commands::Generate(args)) = cli.command else {
        panic!("expected generate command");
    };
    assert_eq!(args.platform, Platform::Tiktok);
    assert_eq!(args.content_type, ContentType::Video);
    assert_eq!(args.language, Some(Language::Amharic));
    assert_eq!(args.number_of_shots, 5);
    assert_eq!(args.cta.as_deref(), Some("Visit us today"));
    assert_eq!(args.brand.as_deref(), Some("Addis Cafe"));
    assert!(args.no_wait);
    assert_eq!(args.save, Some(Bucket::Library));
}

#[test]
fn generate_requires_an_idea() {
    assert!(Cli::try_parse_from(["socialspark", "generate"]).is_err());
}

#[test]
fn generate_rejects_unknown_platform() {
    let result = Cli::try_parse_from([
        "socialspark",
        "generate",
        "--idea",
        "x",
        "--platform",
        "myspace",
    ]);
    assert!(result.is_err());
}

#[test]
fn parses_library_list_filters() {
    let cli = Cli::try_parse_from([
        "socialspark",
        "library",
        "list",
        "--query",
        "latte",
        "--type",
        "image",
        "--platform",
        "ig",
    ])
    .unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Library {
            command: LibraryCommands::List {
                query: Some(_),
                content_type: Some(ContentType::Image),
                platform: Some(Platform::Instagram),
                status: None,
            }
        })
    ));
}

#[test]
fn parses_library_status_with_expected_version() {
    let id = Uuid::new_v4();
    let id_arg = id.to_string();
    let cli = Cli::try_parse_from([
        "socialspark",
        "library",
        "status",
        id_arg.as_str(),
        "published",
        "--expect-version",
        "3",
    ])
    .unwrap();
    match cli.command {
        Some(Commands::Library {
            command:
                LibraryCommands::Status {
                    id: parsed,
                    status,
                    expect_version,
                },
        }) => {
            assert_eq!(parsed, id);
            assert_eq!(status, socialspark_core::DraftStatus::Published);
            assert_eq!(expect_version, Some(3));
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn library_show_rejects_non_uuid() {
    assert!(Cli::try_parse_from(["socialspark", "library", "show", "42"]).is_err());
}

#[test]
fn parses_library_seed() {
    let cli = Cli::try_parse_from(["socialspark", "library", "seed"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Library {
            command: LibraryCommands::Seed
        })
    ));
}

#[test]
fn parses_task_wait_with_deadline() {
    let cli =
        Cli::try_parse_from(["socialspark", "task", "wait", "t-1", "--deadline-secs", "60"]).unwrap();
    match cli.command {
        Some(Commands::Task {
            command:
                TaskCommands::Wait {
                    task_id,
                    deadline_secs,
                    draft,
                },
        }) => {
            assert_eq!(task_id, "t-1");
            assert_eq!(deadline_secs, Some(60));
            assert!(draft.is_none());
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn parses_task_wait_into_a_library_draft() {
    let draft_id = Uuid::new_v4();
    let draft_arg = draft_id.to_string();
    let cli = Cli::try_parse_from([
        "socialspark",
        "task",
        "wait",
        "render-1",
        "--draft",
        draft_arg.as_str(),
    ])
    .unwrap();
    match cli.command {
        Some(Commands::Task {
            command: TaskCommands::Wait { task_id, draft, .. },
        }) => {
            assert_eq!(task_id, "render-1");
            assert_eq!(draft, Some(draft_id));
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn parses_library_update_fields() {
    let id = Uuid::new_v4();
    let id_arg = id.to_string();
    let cli = Cli::try_parse_from([
        "socialspark",
        "library",
        "update",
        id_arg.as_str(),
        "--caption",
        "Now with oat milk",
        "--hashtag",
        "OatLatte,coffee-lover",
        "--hashtag",
        "AddisAbebaCafe",
        "--expect-version",
        "2",
    ])
    .unwrap();
    match cli.command {
        Some(Commands::Library {
            command:
                LibraryCommands::Update {
                    id: parsed,
                    title,
                    caption,
                    hashtags,
                    image_url,
                    expect_version,
                },
        }) => {
            assert_eq!(parsed, id);
            assert!(title.is_none());
            assert_eq!(caption.as_deref(), Some("Now with oat milk"));
            assert_eq!(hashtags, vec!["OatLatte", "coffee-lover", "AddisAbebaCafe"]);
            assert!(image_url.is_none());
            assert_eq!(expect_version, Some(2));
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn parses_schedule_post_with_several_platforms() {
    let cli = Cli::try_parse_from([
        "socialspark",
        "schedule",
        "--asset",
        "asset-1",
        "--platform",
        "instagram,tiktok",
        "--platform",
        "x",
        "--at",
        "2026-11-01T09:00",
    ])
    .unwrap();
    match cli.command {
        Some(Commands::Schedule {
            command: None,
            post,
        }) => {
            assert_eq!(post.asset.as_deref(), Some("asset-1"));
            assert_eq!(
                post.platforms,
                vec![Platform::Instagram, Platform::Tiktok, Platform::Twitter]
            );
            assert_eq!(post.at.as_deref(), Some("2026-11-01T09:00"));
            assert!(post.text.is_none());
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn parses_schedule_times() {
    let cli = Cli::try_parse_from(["socialspark", "schedule", "times", "tiktok"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Schedule {
            command: Some(ScheduleCommands::Times {
                platform: Platform::Tiktok
            }),
            ..
        })
    ));
}

#[test]
fn parses_store_commands() {
    let cli = Cli::try_parse_from(["socialspark", "store", "migrate"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Store {
            command: StoreCommands::Migrate
        })
    ));
    let cli = Cli::try_parse_from(["socialspark", "store", "clear"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Store {
            command: StoreCommands::Clear
        })
    ));
}
