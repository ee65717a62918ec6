//! Prompt construction.
//!
//! Every prompt that expects structured output spells out an exact
//! `LABEL: value` contract so [`crate::parse`] can read the response
//! line by line.

use sim_types::{Event, EventType, Post, User};

/// System preamble prepended to every prompt when no custom instruction
/// set is selected.
pub const DEFAULT_INSTRUCTIONS: &str = "\
You are a social media user. Write authentic, natural posts that match your user profile.

CRITICAL GUIDELINES FOR NATURAL WRITING:
1. NEVER start posts with time references like \"Just...\", \"Today I...\", \"Currently...\", \"Finally...\" or \"Recently...\"
2. AVOID overused expressions: \"I'm excited to...\", \"Can't believe...\", \"So happy to...\", \"I'm thrilled...\"
3. Write like real social media: mix short and long posts, use natural punctuation, vary sentence structures, use emojis sparingly.
4. Create an authentic voice: show personality, express opinions, ask questions, share experiences.

Write ONLY the post content. No meta commentary or explanations.";

/// Shared profile block used by post, reply, and vote prompts.
fn profile_block(user: &User) -> String {
    format!(
        "Personal Information:\n\
         - Age: {age}\n\
         - Gender: {gender}\n\
         - Region: {region}\n\
         - Member since: {joined}\n\n\
         Interests and Preferences:\n\
         - Primary interests: {interests}\n\
         - Frequently used tags: {tags}\n\
         - Common likes: {likes}\n\
         - Common dislikes: {dislikes}\n\n\
         Communication Style:\n\
         - Tone: {tone}\n\
         - Verbosity level: {verbosity}/10\n\
         - Response speed: {speed}/10\n\
         - Interaction value: {interaction}/10",
        age = user.age,
        gender = user.gender.key(),
        region = user.region,
        joined = user.joined_at.format("%Y-%m-%d"),
        interests = user.interests.join(", "),
        tags = user.used_tag_names().join(", "),
        likes = user.top_likes(5).join(", "),
        dislikes = user.top_dislikes(5).join(", "),
        tone = user.profile.tone,
        verbosity = user.profile.verbosity,
        speed = user.profile.response_speed,
        interaction = user.interaction_value,
    )
}

fn instruction_block(injected: &[String]) -> String {
    if injected.is_empty() {
        return String::new();
    }
    let lines: Vec<String> = injected.iter().map(|i| format!("- {i}")).collect();
    format!("\nCRITICAL BEHAVIORAL INSTRUCTIONS:\n{}\n", lines.join("\n"))
}

/// Prompt for a fresh username and 4-6 interests.
pub fn user_prompt(age: u8, gender: &str, region: &str, tone: &str, verbosity: u8, interaction: u8) -> String {
    format!(
        "Generate a unique username and 4-6 interests for a social media user with the following profile:\n\n\
         Demographics:\n\
         - Age: {age}\n\
         - Gender: {gender}\n\
         - Region: {region}\n\
         - Tone: {tone}\n\
         - Verbosity: {verbosity}/10\n\
         - Interaction Level: {interaction}/10\n\n\
         CRITICAL USERNAME GUIDELINES:\n\
         1. AVOID overused prefixes: no \"Tech\", \"Cyber\", or \"Digital\" prefixes, limit numbers to 2 digits.\n\
         2. CREATE VARIETY: mix interests and personality traits, use creative wordplay.\n\
         3. USERNAME RULES: 3-15 characters, no special characters, memorable and natural sounding.\n\
         4. INTERESTS RULES: each interest 5 words or less, specific, related to the demographics, include niche interests.\n\n\
         Format your response EXACTLY like this:\n\
         USERNAME: PixelPainter\n\
         INTERESTS: Vintage Synthesizer Repair, Bouldering, Science Fiction Writing, Urban Beekeeping, Sustainable Fashion"
    )
}

/// Retry prompt used when the first pass produced fewer than four interests.
pub fn interests_retry_prompt(age: u8, gender: &str, region: &str) -> String {
    format!(
        "Based on this user's demographics (Age: {age}, Gender: {gender}, Region: {region}), \
         generate 4-6 SPECIFIC interests. Each interest must be unique, 5 words or less, and relate \
         to real hobbies, activities, or topics that would genuinely interest someone with this profile.\n\n\
         Format: INTERESTS: Rock Climbing, Vintage Camera Collecting, Korean Cooking, Jazz Piano"
    )
}

/// Prompt for a free-form region when demographic region weights are off.
pub fn region_prompt() -> String {
    "Generate a region or location for a social media user.\n\n\
     CRITICAL GUIDELINES:\n\
     1. Create a unique, specific region or location: a city, metropolitan area, cultural region, or geographic region.\n\
     2. AVOID generic continents, bare country names, and vague terms like \"urban\" or \"rural\".\n\
     3. Make it specific, memorable, geographically plausible, and 1-4 words maximum.\n\n\
     Format your response EXACTLY like this:\n\
     REGION: Silicon Valley\n\n\
     or\n\
     REGION: Scottish Highlands"
        .to_string()
}

/// Prompt for an original post, optionally tied to an event.
pub fn post_prompt(user: &User, event: Option<&Event>, injected: &[String]) -> String {
    let task = match event {
        Some(event) => format!(
            "You are posting about this event:\n\
             Title: {}\n\
             Description: {}\n\n\
             Write a social media post that reflects your thoughts on this event.\n\n\
             IMPORTANT:\n\
             - React naturally based on your personality and interests\n\
             - Consider your region and background\n\
             - Express authentic opinions\n\
             - Don't force agreement or disagreement",
            event.title, event.description
        ),
        None => "Write a social media post that reflects your personality and interests.".to_string(),
    };

    format!(
        "You are {username}, a user with the following profile:\n\n\
         {profile}\n\
         {instructions}\n\
         {task}\n\n\
         IMPORTANT: Focus on writing natural, authentic content. Do not include hashtags in your post.\n\n\
         CRITICAL POST GUIDELINES:\n\
         1. Write authentically: use your natural voice, express genuine opinions, share real experiences.\n\
         2. Avoid cliché openers: no \"Just...\", \"Finally...\", \"Can't believe...\", \"So excited to...\".\n\
         3. Be specific: include concrete details and reference real situations.\n\
         4. Show personality: match your tone style and keep a consistent voice.\n\
         5. Keep it natural: vary sentence length and use occasional emojis.",
        username = user.username,
        profile = profile_block(user),
        instructions = instruction_block(injected),
        task = task,
    )
}

/// Prompt for a threaded reply.
pub fn reply_prompt(user: &User, original: &Post, previous: &[&Post], injected: &[String]) -> String {
    let thread = if previous.is_empty() {
        String::new()
    } else {
        let replies: Vec<&str> = previous.iter().map(|p| p.content.as_str()).collect();
        format!("Previous Replies:\n{}\n\n", replies.join("\n\n"))
    };

    format!(
        "You are {username}, a user with the following profile:\n\n\
         {profile}\n\
         {instructions}\n\
         You are replying to a discussion. Here is the conversation so far:\n\n\
         Original Post:\n\
         {original}\n\n\
         {thread}\
         Write a relevant reply that matches your personality and continues the discussion naturally.\n\n\
         IMPORTANT:\n\
         - Focus on writing natural, authentic content\n\
         - Do not include hashtags\n\
         - Stay on topic\n\
         - Consider the context of previous replies\n\
         - Maintain your communication style",
        username = user.username,
        profile = profile_block(user),
        instructions = instruction_block(injected),
        original = original.content,
        thread = thread,
    )
}

/// Prompt asking for hashtags grounded in the post body.
pub fn tags_prompt(content: &str) -> String {
    format!(
        "Analyze this social media post and generate relevant hashtags.\n\n\
         Post content:\n\
         \"{content}\"\n\n\
         CRITICAL TAGGING GUIDELINES:\n\
         1. Tags must directly relate to topics mentioned in the post, with clear evidence in the content.\n\
         2. Start with broader categories and only use specific tags when necessary.\n\
         3. Specific tags are for named events, product releases, specific locations, or technical terms.\n\
         4. Tag structure: hyphens for spaces, all lowercase, no special characters, maximum 3 parts.\n\
         5. Don't duplicate concepts or create variations of the same tag.\n\n\
         Format your response EXACTLY like this:\n\
         TAGS: technology, web-development, react-native"
    )
}

/// Prompt deciding whether `user` likes or dislikes `post`.
pub fn vote_prompt(user: &User, post: &Post) -> String {
    let tags: Vec<String> = post.tags.iter().map(|t| format!("#{t}")).collect();
    format!(
        "Analyze this post and determine if the user would DISLIKE it based on their profile.\n\
         Only return DISLIKE if there are strong, specific reasons to dislike the content.\n\
         Default to LIKE unless there are clear conflicts with the user's preferences or beliefs.\n\n\
         User Profile:\n\
         - Username: {username}\n\
         - Age: {age}\n\
         - Gender: {gender}\n\
         - Region: {region}\n\
         - Interests: {interests}\n\
         - Common likes: {likes}\n\
         - Common dislikes: {dislikes}\n\
         - Communication style: {tone}\n\n\
         Post Content:\n\
         \"{content}\"\n\n\
         Post Tags: {tags}\n\n\
         CRITICAL VOTING GUIDELINES:\n\
         1. Default to LIKE unless there are strong reasons to dislike.\n\
         2. DISLIKE only when content directly contradicts core interests or beliefs, repeats past dislikes, \
         or is hostile, offensive, or clearly misleading.\n\
         3. DO NOT dislike for neutral content, minor tone mismatches, or topics outside the user's interests.\n\
         4. Be conservative with dislikes. Most content should be liked or ignored.\n\n\
         Format your response EXACTLY like this:\n\
         VOTE: DISLIKE\n\
         REASON: misinformation\n\n\
         or\n\
         VOTE: LIKE\n\
         REASON: technology",
        username = user.username,
        age = user.age,
        gender = user.gender.key(),
        region = user.region,
        interests = user.interests.join(", "),
        likes = user.top_likes(5).join(", "),
        dislikes = user.top_dislikes(5).join(", "),
        tone = user.profile.tone,
        content = post.content,
        tags = tags.join(" "),
    )
}

/// Prompt for a platform event of the given type.
pub fn event_prompt(event_type: EventType, available_regions: &[&str]) -> String {
    let regions_line = if event_type == EventType::Regional {
        "REGIONS: North America, Europe\n"
    } else {
        ""
    };
    format!(
        "Generate a {kind} event for a social media platform.\n\n\
         Event Types:\n\
         - Tag: Specific to certain topics/interests (e.g., new product launch, tech announcement)\n\
         - Regional: Affects specific regions (e.g., local elections, natural events)\n\
         - World: Global impact across multiple regions (e.g., major scientific discovery)\n\n\
         Available Regions: {regions}\n\n\
         CRITICAL GUIDELINES:\n\
         1. Title: Short, newsworthy, and impactful (one line)\n\
         2. Description: One clear, concise sentence explaining the event's impact\n\
         3. Tags: 3-5 relevant hashtags, lowercase with hyphens, including one unique event-specific tag\n\
         4. Regions (if regional): List 1-2 affected regions from the available regions list\n\n\
         CRITICAL: Format your response EXACTLY like this example, with each field on a new line:\n\n\
         TITLE: Major AI Breakthrough in Medical Research\n\
         DESCRIPTION: A revolutionary AI system successfully predicts protein structures for rare diseases, promising faster drug development.\n\
         TAGS: ai-medical-breakthrough-2026, artificial-intelligence, medical-research, healthcare-innovation\n\
         {regions_line}\n\
         IMPORTANT:\n\
         - ALWAYS start each field with the exact label (TITLE:, DESCRIPTION:, etc.)\n\
         - ALWAYS put each field on its own line\n\
         - NEVER include additional text or explanations",
        kind = event_type.key(),
        regions = available_regions.join(", "),
        regions_line = regions_line,
    )
}
