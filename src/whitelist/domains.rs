/// Curated high-traffic domains that skip classification.
pub const BUILTIN_DOMAINS: &[&str] = &[
    // Google
    "google.com", "gmail.com", "youtube.com", "drive.google.com", "docs.google.com",
    "maps.google.com", "meet.google.com", "calendar.google.com", "photos.google.com",
    // Microsoft
    "microsoft.com", "outlook.com", "office.com", "live.com", "hotmail.com",
    "onedrive.live.com", "teams.microsoft.com", "bing.com", "msn.com", "xbox.com",
    // Social
    "facebook.com", "twitter.com", "x.com", "instagram.com", "linkedin.com",
    "reddit.com", "pinterest.com", "tiktok.com", "snapchat.com", "whatsapp.com",
    // Developer platforms
    "github.com", "gitlab.com", "bitbucket.org", "stackoverflow.com", "stackexchange.com",
    "npmjs.com", "pypi.org", "docker.com", "jenkins.io", "travis-ci.org",
    // Productivity
    "notion.so", "slack.com", "zoom.us", "dropbox.com", "box.com", "trello.com",
    "asana.com", "monday.com", "atlassian.net", "jira.com", "confluence.com",
    // E-commerce
    "amazon.com", "ebay.com", "walmart.com", "target.com", "bestbuy.com",
    "shopify.com", "etsy.com", "alibaba.com", "aliexpress.com",
    // Streaming
    "netflix.com", "hulu.com", "spotify.com", "twitch.tv", "vimeo.com",
    "disneyplus.com", "primevideo.com", "crunchyroll.com",
    // Cloud providers
    "aws.amazon.com", "console.aws.amazon.com", "azure.microsoft.com", "cloud.google.com",
    "heroku.com", "digitalocean.com", "linode.com", "vercel.com", "netlify.com",
    "cloudflare.com", "railway.app", "render.com",
    // Finance
    "paypal.com", "stripe.com", "square.com", "venmo.com", "chase.com",
    "bankofamerica.com", "wellsfargo.com", "citibank.com", "coinbase.com",
    // Education
    "coursera.org", "udemy.com", "edx.org", "khanacademy.org", "codecademy.com",
    "udacity.com", "pluralsight.com",
    // News
    "nytimes.com", "bbc.com", "cnn.com", "reuters.com", "theguardian.com",
    "bloomberg.com", "forbes.com", "medium.com", "substack.com",
    // Design
    "figma.com", "canva.com", "adobe.com", "behance.net", "dribbble.com",
    // Communication
    "discord.com", "telegram.org", "signal.org", "skype.com",
    // Other
    "wikipedia.org", "archive.org", "imdb.com", "yelp.com", "craigslist.org",
    "wordpress.com", "blogger.com", "tumblr.com", "quora.com",
    // ML platforms
    "openai.com", "huggingface.co", "kaggle.com", "colab.research.google.com",
    "paperswithcode.com", "arxiv.org",
];
